//! Basic UI widgets

use macroquad::prelude::*;

use super::{
    Rect, UiContext, BUTTON_BG, BUTTON_HOVER, BUTTON_PRESSED, DIALOG_BG, DIALOG_BORDER, ERROR_COLOR,
    FONT_SIZE_CONTENT, FONT_SIZE_HEADER, SCRIM_COLOR, TEXT_COLOR,
};

/// Draw a text button, returns true if clicked
pub fn text_button(ctx: &UiContext, rect: Rect, label: &str) -> bool {
    button_with_fill(ctx, rect, label, None)
}

/// Text button filled with `color` (the primary action)
pub fn accent_button(ctx: &UiContext, rect: Rect, label: &str, color: Color) -> bool {
    button_with_fill(ctx, rect, label, Some(color))
}

fn button_with_fill(ctx: &UiContext, rect: Rect, label: &str, fill: Option<Color>) -> bool {
    let mouse = ctx.widget_mouse();
    let hovered = mouse.inside(&rect);
    let pressed = mouse.clicking(&rect);

    let bg = match fill {
        Some(color) if pressed => Color::new(color.r * 0.8, color.g * 0.8, color.b * 0.8, color.a),
        Some(color) => color,
        None if pressed => BUTTON_PRESSED,
        None if hovered => BUTTON_HOVER,
        None => BUTTON_BG,
    };
    draw_rounded_rect(rect.x, rect.y, rect.w, rect.h, 4.0, bg);
    if hovered && fill.is_some() {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, WHITE);
    }

    let text_color = if fill.is_some() { WHITE } else { TEXT_COLOR };
    draw_text_centered(label, &rect, FONT_SIZE_CONTENT, text_color);

    mouse.clicked(&rect)
}

/// Left-aligned single line of text, vertically centered in `rect`
pub fn label(rect: Rect, text: &str, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    let y = (rect.y + (rect.h + dims.height) * 0.5).round();
    draw_text(text, rect.x.round(), y, font_size, color);
}

fn draw_text_centered(text: &str, rect: &Rect, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    let x = (rect.center_x() - dims.width * 0.5).round();
    let y = (rect.y + (rect.h + dims.height) * 0.5).round();
    draw_text(text, x, y, font_size, color);
}

/// Break `text` into lines no wider than `max_width` pixels
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    wrap_with(text, max_width, |s| measure_text(s, None, font_size as u16, 1.0).width)
}

fn wrap_with(text: &str, max_width: f32, width_of: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if !line.is_empty() && width_of(&candidate) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

/// Modal message box with an OK button. Returns true when dismissed.
pub fn alert_dialog(ctx: &UiContext, screen: Rect, title: &str, message: &str, is_error: bool) -> bool {
    draw_rectangle(screen.x, screen.y, screen.w, screen.h, SCRIM_COLOR);

    let width = 380.0f32.min(screen.w - 20.0).max(120.0);
    let lines = wrap_text(message, FONT_SIZE_CONTENT, width - 32.0);
    let line_h = FONT_SIZE_CONTENT + 5.0;
    let height = 56.0 + lines.len() as f32 * line_h + 52.0;
    let dialog = screen.centered(width, height);

    draw_rounded_rect(dialog.x, dialog.y, dialog.w, dialog.h, 6.0, DIALOG_BG);
    draw_rectangle_lines(dialog.x, dialog.y, dialog.w, dialog.h, 1.0, DIALOG_BORDER);

    let inner = dialog.pad(16.0);
    let title_color = if is_error { ERROR_COLOR } else { TEXT_COLOR };
    label(Rect::new(inner.x, inner.y, inner.w, 24.0), title, FONT_SIZE_HEADER, title_color);
    for (i, line) in lines.iter().enumerate() {
        let row = Rect::new(inner.x, inner.y + 36.0 + i as f32 * line_h, inner.w, line_h);
        label(row, line, FONT_SIZE_CONTENT, TEXT_COLOR);
    }

    let ok = Rect::new(dialog.right() - 96.0, dialog.bottom() - 44.0, 80.0, 30.0);
    // The dialog itself is the one thing that still takes input
    let mouse = ctx.mouse;
    let bg = if mouse.inside(&ok) { BUTTON_HOVER } else { BUTTON_BG };
    draw_rounded_rect(ok.x, ok.y, ok.w, ok.h, 4.0, bg);
    draw_text_centered("OK", &ok, FONT_SIZE_CONTENT, TEXT_COLOR);

    mouse.clicked(&ok) || is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::Escape)
}

/// Draw a rounded rectangle (simple approximation using overlapping rects)
pub fn draw_rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32, color: Color) {
    let r = r.min(w * 0.5).min(h * 0.5);
    draw_rectangle(x + r, y, w - r * 2.0, h, color);
    draw_rectangle(x, y + r, w, h - r * 2.0, color);
    draw_circle(x + r, y + r, r, color);
    draw_circle(x + w - r, y + r, r, color);
    draw_circle(x + r, y + h - r, r, color);
    draw_circle(x + w - r, y + h - r, r, color);
}
