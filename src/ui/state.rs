use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::math::presets::SURFACE_PRESETS;
use crate::math::surface::SurfaceParams;
use crate::scene::TEX_CENTER_STEP;

pub struct UiState {
    pub selected_preset: usize,
    pub params: SurfaceParams,
    pub params_dirty: bool,
    pub surface_error: Option<String>,

    pub vsync_enabled: bool,
    pub show_stats: bool,
    pub show_help: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected_preset: 0,
            params: SURFACE_PRESETS[0].params,
            params_dirty: false,
            surface_error: None,

            vsync_enabled: true,
            show_stats: true,
            show_help: true,
        }
    }
}

impl UiState {
    pub fn select_preset(&mut self, index: usize) {
        if let Some(preset) = SURFACE_PRESETS.get(index) {
            log::debug!("Preset selected: {}", preset.name);
            self.selected_preset = index;
            self.params = preset.params;
            self.params_dirty = true;
        }
    }
}

/// Texture-center offset for arrow keys and WASD, `None` for any other key.
pub fn tex_center_delta(key: KeyCode) -> Option<Vec2> {
    let dir = match key {
        KeyCode::ArrowLeft | KeyCode::KeyA => Vec2::NEG_X,
        KeyCode::ArrowRight | KeyCode::KeyD => Vec2::X,
        KeyCode::ArrowUp | KeyCode::KeyW => Vec2::Y,
        KeyCode::ArrowDown | KeyCode::KeyS => Vec2::NEG_Y,
        _ => return None,
    };
    Some(dir * TEX_CENTER_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Shading;

    #[test]
    fn test_key_mapping() {
        assert_eq!(tex_center_delta(KeyCode::KeyD), Some(Vec2::new(TEX_CENTER_STEP, 0.0)));
        assert_eq!(tex_center_delta(KeyCode::ArrowUp), Some(Vec2::new(0.0, TEX_CENTER_STEP)));
        assert_eq!(tex_center_delta(KeyCode::KeyA), tex_center_delta(KeyCode::ArrowLeft));
        assert_eq!(tex_center_delta(KeyCode::Space), None);
    }

    #[test]
    fn test_keys_never_push_center_below_zero() {
        let mut shading = Shading::default();
        for key in [KeyCode::ArrowLeft, KeyCode::KeyS, KeyCode::KeyA, KeyCode::ArrowDown] {
            if let Some(delta) = tex_center_delta(key) {
                shading.shift_tex_center(delta);
            }
        }
        assert_eq!(shading.tex_center, Vec2::ZERO);

        for _ in 0..3 {
            shading.shift_tex_center(tex_center_delta(KeyCode::KeyW).unwrap());
        }
        shading.shift_tex_center(tex_center_delta(KeyCode::KeyS).unwrap());
        assert!((shading.tex_center.y - 2.0 * TEX_CENTER_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_select_preset() {
        let mut state = UiState::default();
        state.select_preset(2);
        assert_eq!(state.selected_preset, 2);
        assert_eq!(state.params, SURFACE_PRESETS[2].params);
        assert!(state.params_dirty);

        state.params_dirty = false;
        state.select_preset(SURFACE_PRESETS.len());
        assert_eq!(state.selected_preset, 2);
        assert!(!state.params_dirty);
    }
}
