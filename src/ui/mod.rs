//! Immediate-mode UI for the studio side panel
//!
//! - Immediate mode (no retained widget state, rebuilt each frame)
//! - Simple rectangle-based layout
//! - Macroquad integration for rendering

mod input;
mod rect;
mod theme;
mod widgets;

pub use input::*;
pub use rect::*;
pub use theme::*;
pub use widgets::*;
