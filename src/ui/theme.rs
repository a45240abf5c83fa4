//! UI Theme - Shared colors and styling constants

use macroquad::prelude::Color;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Side panel background
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Panel header background
pub const HEADER_COLOR: Color = Color::new(0.15, 0.15, 0.18, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Accent color for the primary action
pub const ACCENT_COLOR: Color = Color::new(0.0, 0.75, 0.9, 1.0);

/// Light grey behind the mug (#f0f0f0)
pub const PREVIEW_BG: Color = Color::new(0.941, 0.941, 0.941, 1.0);

// =============================================================================
// Buttons
// =============================================================================

pub const BUTTON_BG: Color = Color::new(0.196, 0.196, 0.216, 1.0);
pub const BUTTON_HOVER: Color = Color::new(0.235, 0.235, 0.275, 1.0);
pub const BUTTON_PRESSED: Color = Color::new(0.275, 0.275, 0.314, 1.0);

// =============================================================================
// Alert dialog
// =============================================================================

/// Dims everything behind an open alert
pub const SCRIM_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.45);

pub const DIALOG_BG: Color = Color::new(0.176, 0.176, 0.196, 1.0);
pub const DIALOG_BORDER: Color = Color::new(0.314, 0.314, 0.314, 1.0);

/// Title color for error alerts
pub const ERROR_COLOR: Color = Color::new(0.95, 0.4, 0.4, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 18.0;
pub const FONT_SIZE_CONTENT: f32 = 15.0;
pub const FONT_SIZE_SMALL: f32 = 12.0;
