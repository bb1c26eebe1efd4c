use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use egui::style::WidgetVisuals;

pub const BG_BLACK: Color32 = Color32::from_rgb(0, 0, 0);
pub const BG_PANEL: Color32 = Color32::from_rgb(6, 9, 11);
pub const BG_WIDGET: Color32 = Color32::from_rgb(14, 20, 24);
pub const BG_WIDGET_HOVER: Color32 = Color32::from_rgb(22, 32, 38);
pub const BG_WIDGET_ACTIVE: Color32 = Color32::from_rgb(30, 44, 52);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(170, 178, 180);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(104, 112, 116);
pub const TEXT_BRIGHT: Color32 = Color32::from_rgb(222, 228, 230);

pub const ACCENT_CYAN: Color32 = Color32::from_rgb(0, 200, 200);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(46, 172, 35);
pub const ACCENT_ORANGE: Color32 = Color32::from_rgb(200, 130, 40);
pub const ACCENT_RED: Color32 = Color32::from_rgb(190, 45, 50);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(30, 70, 78, 77);

fn widget(bg: Color32, stroke: Stroke, fg: Color32, expansion: f32) -> WidgetVisuals {
    WidgetVisuals {
        bg_fill: bg,
        weak_bg_fill: bg,
        bg_stroke: stroke,
        rounding: Rounding::same(3.0),
        fg_stroke: Stroke::new(1.0, fg),
        expansion,
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive = widget(BG_PANEL, Stroke::new(1.0, BORDER_SUBTLE), TEXT_MUTED, 0.0);
    visuals.widgets.inactive = widget(BG_WIDGET, Stroke::new(1.0, BORDER_SUBTLE), TEXT_PRIMARY, 0.0);
    visuals.widgets.hovered = widget(BG_WIDGET_HOVER, Stroke::new(1.0, ACCENT_CYAN), TEXT_BRIGHT, 1.0);
    visuals.widgets.active = widget(BG_WIDGET_ACTIVE, Stroke::new(2.0, ACCENT_CYAN), TEXT_BRIGHT, 1.0);
    visuals.widgets.open = widget(BG_WIDGET_ACTIVE, Stroke::new(1.0, ACCENT_CYAN), TEXT_BRIGHT, 0.0);

    visuals.selection = egui::style::Selection {
        bg_fill: ACCENT_CYAN.gamma_multiply(0.35),
        stroke: Stroke::new(1.0, ACCENT_CYAN),
    };

    visuals.hyperlink_color = ACCENT_CYAN;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_BLACK;
    visuals.warn_fg_color = ACCENT_ORANGE;
    visuals.error_fg_color = ACCENT_RED;
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_PANEL;
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.window_rounding = Rounding::same(6.0);
    visuals.menu_rounding = Rounding::same(3.0);
    visuals.slider_trailing_fill = true;

    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.interact_size.x = 56.0;

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
