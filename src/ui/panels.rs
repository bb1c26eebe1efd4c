use std::ops::RangeInclusive;

use egui::{Color32, Context, RichText, ScrollArea, Ui};

use crate::math::SURFACE_PRESETS;
use crate::math::surface::{Profile, Sweep};
use crate::scene::{Shading, TEX_CENTER_STEP};
use crate::ui::state::UiState;
use crate::ui::theme::*;

#[derive(Default)]
pub struct UiActions {
    pub regenerate: bool,
    pub reset_view: bool,
    pub set_vsync: Option<bool>,
}

pub struct PanelStats<'a> {
    pub fps: f32,
    pub vertex_count: usize,
    pub texture_size: Option<(u32, u32)>,
    pub texture_error: Option<&'a str>,
}

pub fn draw_side_panel(
    ctx: &Context,
    state: &mut UiState,
    shading: &mut Shading,
    stats: &PanelStats,
) -> UiActions {
    let mut actions = UiActions::default();

    egui::SidePanel::right("control_panel")
        .min_width(280.0)
        .max_width(360.0)
        .default_width(300.0)
        .frame(egui::Frame::default().fill(BG_PANEL).inner_margin(14.0))
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading(RichText::new("Revolve 3D").strong());
                ui.add_space(4.0);
                ui.label(RichText::new("Surfaces of revolution").color(TEXT_MUTED).size(11.0));
                ui.add_space(14.0);

                section_header(ui, "LIGHT");
                vec3_row(ui, "Position", &mut shading.light_position, 0.1);
                ui.add_space(14.0);

                section_header(ui, "TEXTURE");
                egui::Grid::new("texture_grid").num_columns(3).spacing([8.0, 4.0]).show(ui, |ui| {
                    ui.label("Scale");
                    ui.add(egui::DragValue::new(&mut shading.tex_scale.x).speed(0.05));
                    ui.add(egui::DragValue::new(&mut shading.tex_scale.y).speed(0.05));
                    ui.end_row();

                    ui.label("Center");
                    ui.add(
                        egui::DragValue::new(&mut shading.tex_center.x)
                            .speed(TEX_CENTER_STEP)
                            .range(0.0..=f32::MAX),
                    );
                    ui.add(
                        egui::DragValue::new(&mut shading.tex_center.y)
                            .speed(TEX_CENTER_STEP)
                            .range(0.0..=f32::MAX),
                    );
                    ui.end_row();
                });
                match (stats.texture_size, stats.texture_error) {
                    (_, Some(err)) => error_box(ui, err),
                    (Some((w, h)), None) => {
                        ui.label(RichText::new(format!("{}x{}", w, h)).color(TEXT_MUTED).size(11.0));
                    }
                    (None, None) => {
                        ui.label(RichText::new("Loading...").color(TEXT_MUTED).size(11.0).italics());
                    }
                }
                ui.add_space(14.0);

                ui.separator();
                ui.add_space(10.0);

                section_header(ui, "SURFACE");
                egui::ComboBox::from_id_salt("surface_presets")
                    .selected_text(SURFACE_PRESETS[state.selected_preset].name)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for (i, preset) in SURFACE_PRESETS.iter().enumerate() {
                            if ui.selectable_label(state.selected_preset == i, preset.name).clicked() {
                                state.select_preset(i);
                            }
                        }
                    });
                ui.add_space(4.0);
                ui.label(
                    RichText::new(SURFACE_PRESETS[state.selected_preset].description)
                        .color(TEXT_MUTED)
                        .size(11.0)
                        .italics(),
                );
                ui.add_space(8.0);

                if surface_controls(ui, state) {
                    state.params_dirty = true;
                }
                if let Some(err) = &state.surface_error {
                    error_box(ui, err);
                }
                actions.regenerate = state.params_dirty;
                ui.add_space(14.0);

                section_header(ui, "VIEW");
                ui.horizontal(|ui| {
                    if ui.button("Reset rotation").clicked() {
                        actions.reset_view = true;
                    }
                    if ui.checkbox(&mut state.vsync_enabled, "VSync").changed() {
                        actions.set_vsync = Some(state.vsync_enabled);
                    }
                });
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.show_stats, "Stats");
                    ui.checkbox(&mut state.show_help, "Help");
                });
                ui.add_space(14.0);

                if state.show_stats {
                    ui.separator();
                    ui.add_space(10.0);
                    stats_panel(ui, stats);
                }
            });
        });

    actions
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn vec3_row(ui: &mut Ui, label: &str, v: &mut glam::Vec3, speed: f64) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(&mut v.x).speed(speed).prefix("x "));
        ui.add(egui::DragValue::new(&mut v.y).speed(speed).prefix("y "));
        ui.add(egui::DragValue::new(&mut v.z).speed(speed).prefix("z "));
    });
}

fn error_box(ui: &mut Ui, err: &str) {
    ui.add_space(6.0);
    egui::Frame::default()
        .fill(Color32::from_rgb(40, 14, 18))
        .stroke(egui::Stroke::new(1.0, ACCENT_RED))
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(err).color(ACCENT_RED).size(11.0));
        });
}

fn surface_controls(ui: &mut Ui, state: &mut UiState) -> bool {
    let params = &mut state.params;
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Profile:");
        for profile in [Profile::AngularSine, Profile::SineSquared, Profile::OneMinusCosine] {
            if ui.selectable_label(params.profile == profile, profile.label()).clicked()
                && params.profile != profile
            {
                params.profile = profile;
                changed = true;
            }
        }
    });
    ui.horizontal(|ui| {
        ui.label("Sweep:");
        for (sweep, label) in [(Sweep::Forward, "Forward"), (Sweep::ForwardAndBack, "Forward + back")] {
            if ui.selectable_label(params.sweep == sweep, label).clicked() && params.sweep != sweep {
                params.sweep = sweep;
                changed = true;
            }
        }
    });
    ui.add_space(4.0);

    egui::Grid::new("surface_params").num_columns(2).spacing([12.0, 4.0]).show(ui, |ui| {
        let mut row = |ui: &mut Ui, label: &str, value: &mut f64, speed: f64, range: RangeInclusive<f64>| {
            ui.label(label);
            changed |= ui.add(egui::DragValue::new(value).speed(speed).range(range)).changed();
            ui.end_row();
        };
        row(ui, "r1", &mut params.r1, 0.05, -100.0..=100.0);
        row(ui, "r2", &mut params.r2, 0.05, -100.0..=100.0);
        row(ui, "l", &mut params.l, 0.05, 0.05..=10.0);
        row(ui, "da", &mut params.da, 0.01, 0.01..=2.0);
        row(ui, "db", &mut params.db, 0.1, 0.5..=90.0);
        row(ui, "da offset", &mut params.da_offset, 0.01, -2.0..=2.0);
        row(ui, "db offset", &mut params.db_offset, 0.1, -90.0..=90.0);
    });

    changed
}

fn stats_panel(ui: &mut Ui, stats: &PanelStats) {
    section_header(ui, "STATISTICS");
    egui::Frame::default()
        .fill(BG_WIDGET)
        .stroke(egui::Stroke::new(1.0, BORDER_SUBTLE))
        .rounding(6.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));

            let fps_color = if stats.fps >= 60.0 {
                ACCENT_GREEN
            } else if stats.fps >= 30.0 {
                ACCENT_ORANGE
            } else {
                ACCENT_RED
            };

            egui::Grid::new("stats").num_columns(2).spacing([20.0, 4.0]).show(ui, |ui| {
                ui.label(RichText::new("FPS").color(TEXT_MUTED));
                ui.label(RichText::new(format!("{:.0}", stats.fps)).color(fps_color));
                ui.end_row();

                ui.label(RichText::new("Vertices").color(TEXT_MUTED));
                ui.label(RichText::new(fmt_num(stats.vertex_count)).color(ACCENT_CYAN));
                ui.end_row();

                ui.label(RichText::new("Triangles").color(TEXT_MUTED));
                ui.label(
                    RichText::new(fmt_num(stats.vertex_count.saturating_sub(2))).color(TEXT_PRIMARY),
                );
                ui.end_row();
            });
        });
}

pub fn draw_help_overlay(ctx: &Context, tex_center: glam::Vec2) {
    egui::Area::new(egui::Id::new("help_overlay"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::default()
                .fill(Color32::from_black_alpha(180))
                .rounding(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.style_mut().override_font_id = Some(egui::FontId::new(11.0, egui::FontFamily::Monospace));
                    ui.label(RichText::new("LMB+Drag - Rotate | Arrows/WASD - Texture center").color(TEXT_MUTED));
                    ui.label(
                        RichText::new(format!("Center: ({:.2}, {:.2})", tex_center.x, tex_center.y))
                            .color(TEXT_MUTED),
                    );
                });
        });
}

fn fmt_num(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(999), "999");
        assert_eq!(fmt_num(30_324), "30.3K");
        assert_eq!(fmt_num(2_500_000), "2.50M");
    }
}
