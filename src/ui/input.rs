//! Input state for UI interaction

use macroquad::prelude::{
    is_mouse_button_down, is_mouse_button_pressed, mouse_position, mouse_wheel, MouseButton,
};

use super::Rect;

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool, // Just pressed this frame
    pub scroll: f32,        // Scroll wheel delta
}

impl MouseState {
    /// Sample macroquad's mouse for this frame
    pub fn capture() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            scroll: mouse_wheel().1,
        }
    }

    /// Check if mouse is inside a rect
    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    /// Check if mouse is clicking inside a rect
    pub fn clicking(&self, rect: &Rect) -> bool {
        self.left_down && rect.contains(self.x, self.y)
    }

    /// Check if mouse just clicked inside a rect
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// UI context passed through the frame
pub struct UiContext {
    pub mouse: MouseState,
    /// Mouse position at the previous frame
    last: (f32, f32),
    /// A drag that started inside some region is in progress
    dragging: bool,
    /// Input is swallowed by a modal dialog this frame
    pub modal: bool,
}

impl UiContext {
    pub fn new() -> Self {
        Self {
            mouse: MouseState::default(),
            last: (0.0, 0.0),
            dragging: false,
            modal: false,
        }
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.last = (self.mouse.x, self.mouse.y);
        self.mouse = mouse;
        self.modal = false;
        if !self.mouse.left_down {
            self.dragging = false;
        }
    }

    /// Mouse as seen by ordinary widgets (nothing pressed while a modal is up)
    pub fn widget_mouse(&self) -> MouseState {
        if self.modal {
            MouseState {
                left_down: false,
                left_pressed: false,
                scroll: 0.0,
                ..self.mouse
            }
        } else {
            self.mouse
        }
    }

    /// Drag movement inside `rect` this frame.
    ///
    /// A drag has to start inside `rect` but may leave it afterwards.
    pub fn drag_in(&mut self, rect: &Rect) -> Option<(f32, f32)> {
        let mouse = self.widget_mouse();
        if mouse.left_pressed && mouse.inside(rect) {
            self.dragging = true;
            return None;
        }
        if self.dragging && mouse.left_down {
            Some((mouse.x - self.last.0, mouse.y - self.last.1))
        } else {
            None
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(x: f32, y: f32, down: bool, pressed: bool) -> MouseState {
        MouseState {
            x,
            y,
            left_down: down,
            left_pressed: pressed,
            ..Default::default()
        }
    }

    #[test]
    fn test_drag_must_start_inside() {
        let area = Rect::new(100.0, 0.0, 100.0, 100.0);
        let mut ctx = UiContext::new();

        ctx.begin_frame(mouse(10.0, 10.0, true, true));
        assert_eq!(ctx.drag_in(&area), None);
        ctx.begin_frame(mouse(150.0, 10.0, true, false));
        assert_eq!(ctx.drag_in(&area), None);
    }

    #[test]
    fn test_drag_reports_deltas_until_release() {
        let area = Rect::new(100.0, 0.0, 100.0, 100.0);
        let mut ctx = UiContext::new();

        ctx.begin_frame(mouse(150.0, 50.0, true, true));
        assert_eq!(ctx.drag_in(&area), None);
        ctx.begin_frame(mouse(160.0, 45.0, true, false));
        assert_eq!(ctx.drag_in(&area), Some((10.0, -5.0)));
        // Leaving the area keeps the drag alive
        ctx.begin_frame(mouse(260.0, 45.0, true, false));
        assert_eq!(ctx.drag_in(&area), Some((100.0, 0.0)));

        ctx.begin_frame(mouse(260.0, 45.0, false, false));
        assert_eq!(ctx.drag_in(&area), None);
        assert!(!ctx.is_dragging());
    }

    #[test]
    fn test_modal_swallows_clicks() {
        let mut ctx = UiContext::new();
        ctx.begin_frame(mouse(5.0, 5.0, true, true));
        ctx.modal = true;
        let seen = ctx.widget_mouse();
        assert!(!seen.clicked(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert_eq!((seen.x, seen.y), (5.0, 5.0));
    }
}
