//! Texture compositor
//!
//! Owns the drawing surface that mirrors the mug's original texture and
//! paints raster images into it. The surface is the single source of truth
//! for the mug's look; the 3D preview only holds a GPU copy that it refreshes
//! whenever the surface reports itself dirty.
//!
//! ## Overview
//!
//! - **TextureSurface**: fixed-size RGBA8 buffer with a dirty flag
//! - **PaintRect**: destination rectangle in surface pixels
//! - **placement**: where photos and stickers land on the surface
//! - **PlacedSticker**: record of a sticker already painted

mod placement;
mod surface;

pub use placement::{photo_rect, PaintRect, PlacedSticker, StickerKind, STICKER_RECT};
pub use surface::{resample, TextureSurface};
