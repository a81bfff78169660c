pub mod panels;
pub mod state;
pub mod theme;

pub use panels::{CameraReadout, draw_info_overlay};
pub use state::UiState;
pub use theme::apply_theme;
