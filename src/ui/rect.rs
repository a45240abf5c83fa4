//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Whole window
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// Split at a fixed pixel width from the left, returns (left, right)
    pub fn split_h_px(&self, pixels: f32) -> (Self, Self) {
        let split_x = pixels.clamp(0.0, self.w);
        (
            Self::new(self.x, self.y, split_x, self.h),
            Self::new(self.x + split_x, self.y, self.w - split_x, self.h),
        )
    }

    /// Rectangle of `w` x `h` centered inside this one
    pub fn centered(&self, w: f32, h: f32) -> Self {
        Self::new(self.center_x() - w * 0.5, self.center_y() - h * 0.5, w, h)
    }
}

/// Hands out fixed-height rows top to bottom, for stacking panel widgets
pub struct Column {
    rect: Rect,
    cursor_y: f32,
    gap: f32,
}

impl Column {
    pub fn new(rect: Rect, gap: f32) -> Self {
        Self {
            rect,
            cursor_y: rect.y,
            gap,
        }
    }

    /// Next row of the given height (clipped to the column)
    pub fn row(&mut self, height: f32) -> Rect {
        let h = height.min((self.rect.bottom() - self.cursor_y).max(0.0));
        let row = Rect::new(self.rect.x, self.cursor_y, self.rect.w, h);
        self.cursor_y += h + self.gap;
        row
    }

    /// Leave vertical space
    pub fn skip(&mut self, height: f32) {
        self.cursor_y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_h_px() {
        let r = Rect::new(0.0, 0.0, 800.0, 600.0);
        let (panel, view) = r.split_h_px(220.0);
        assert_eq!(panel, Rect::new(0.0, 0.0, 220.0, 600.0));
        assert_eq!(view, Rect::new(220.0, 0.0, 580.0, 600.0));
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(10.0, 20.0));
        assert!(!r.contains(110.0, 40.0));
        assert!(!r.contains(50.0, 70.0));
    }

    #[test]
    fn test_centered() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0).centered(40.0, 20.0);
        assert_eq!(r, Rect::new(30.0, 40.0, 40.0, 20.0));
    }

    #[test]
    fn test_column_rows_stack_and_clip() {
        let mut column = Column::new(Rect::new(5.0, 10.0, 200.0, 70.0), 4.0);
        assert_eq!(column.row(30.0), Rect::new(5.0, 10.0, 200.0, 30.0));
        column.skip(6.0);
        assert_eq!(column.row(30.0), Rect::new(5.0, 50.0, 200.0, 30.0));
        // Nothing left
        assert_eq!(column.row(30.0).h, 0.0);
    }
}
