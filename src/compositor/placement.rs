//! Placement policies for photos and stickers
//!
//! Photos are scaled to half the surface width and centered. Stickers all
//! land on the same fixed rectangle, so a second sticker covers the first.

use serde::{Deserialize, Serialize};

/// Destination rectangle on the texture surface, in surface pixels.
///
/// Fractional values are allowed; the surface rounds them when painting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PaintRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Fixed rectangle every sticker is painted at, regardless of kind
pub const STICKER_RECT: PaintRect = PaintRect::new(100.0, 100.0, 200.0, 200.0);

/// Rectangle for an uploaded photo of `image_width` x `image_height` on a
/// surface of `surface_width` x `surface_height`.
///
/// The photo is half as wide as the surface, keeps its aspect ratio and sits
/// at the surface's midpoint.
pub fn photo_rect(surface_width: u32, surface_height: u32, image_width: u32, image_height: u32) -> PaintRect {
    let surface_w = surface_width as f32;
    let surface_h = surface_height as f32;

    let target_w = surface_w * 0.5;
    let target_h = if image_width == 0 {
        0.0
    } else {
        target_w * (image_height as f32 / image_width as f32)
    };

    PaintRect {
        x: (surface_w - target_w) / 2.0,
        y: (surface_h - target_h) / 2.0,
        width: target_w,
        height: target_h,
    }
}

/// Decorative sticker kinds offered in the side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerKind {
    Heart,
    Cat,
}

impl StickerKind {
    pub const ALL: [StickerKind; 2] = [StickerKind::Heart, StickerKind::Cat];

    /// Parse the kind attribute a sticker button declares
    pub fn from_attr(attr: &str) -> Option<StickerKind> {
        match attr {
            "heart" => Some(StickerKind::Heart),
            "cat" => Some(StickerKind::Cat),
            _ => None,
        }
    }

    /// The attribute string a sticker button declares for this kind
    pub fn attr(&self) -> &'static str {
        match self {
            StickerKind::Heart => "heart",
            StickerKind::Cat => "cat",
        }
    }

    /// Display label for UI
    pub fn label(&self) -> &'static str {
        match self {
            StickerKind::Heart => "Heart",
            StickerKind::Cat => "Cat",
        }
    }
}

/// A sticker that has been painted onto the surface.
///
/// Records are append-only; their order is the paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSticker {
    pub kind: StickerKind,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PlacedSticker {
    /// Record for a sticker painted at the fixed sticker rectangle
    pub fn at_sticker_rect(kind: StickerKind) -> Self {
        Self {
            kind,
            x: STICKER_RECT.x as u32,
            y: STICKER_RECT.y as u32,
            width: STICKER_RECT.width as u32,
            height: STICKER_RECT.height as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_rect_centered_half_width() {
        // 1024x512 surface, 400x300 photo
        let rect = photo_rect(1024, 512, 400, 300);
        assert_eq!(rect.width, 512.0);
        assert_eq!(rect.height, 384.0);
        assert_eq!(rect.x, (1024.0 - 512.0) / 2.0);
        assert_eq!(rect.y, (512.0 - 384.0) / 2.0);
    }

    #[test]
    fn test_photo_rect_tall_image_overhangs() {
        // Tall photos extend past the surface; the surface clips them
        let rect = photo_rect(200, 100, 100, 400);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 400.0);
        assert_eq!(rect.y, -150.0);
        assert!(rect.y + rect.height > 100.0);
    }

    #[test]
    fn test_photo_rect_degenerate_image() {
        let rect = photo_rect(256, 256, 0, 10);
        assert_eq!(rect.height, 0.0);
    }

    #[test]
    fn test_sticker_kind_attr() {
        assert_eq!(StickerKind::from_attr("heart"), Some(StickerKind::Heart));
        assert_eq!(StickerKind::from_attr("cat"), Some(StickerKind::Cat));
        assert_eq!(StickerKind::from_attr("dog"), None);
        assert_eq!(StickerKind::from_attr("Heart"), None);
        for kind in StickerKind::ALL {
            assert_eq!(StickerKind::from_attr(kind.attr()), Some(kind));
        }
    }

    #[test]
    fn test_placed_sticker_json() {
        let record = PlacedSticker::at_sticker_rect(StickerKind::Heart);
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "heart", "x": 100, "y": 100, "width": 200, "height": 200})
        );
    }
}
