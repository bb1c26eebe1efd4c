pub mod panels;
pub mod state;
pub mod theme;

pub use panels::{PanelStats, UiActions, draw_help_overlay, draw_side_panel};
pub use state::{UiState, tex_center_delta};
pub use theme::apply_theme;
