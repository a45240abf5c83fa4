//! Texture surface - the mug's paintable texture
//!
//! A fixed-size RGBA8 buffer created from the model's original texture.
//! Every paint marks the surface dirty; the preview polls `take_dirty` once
//! per frame and re-uploads the pixels when it returns true.

use std::io::Cursor;

use base64::Engine;
use image::{imageops, imageops::FilterType, ImageFormat, Rgba, RgbaImage};

use super::PaintRect;

/// Resample `image` to `width` x `height` the way the surface does when painting
pub fn resample(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// Paintable texture surface.
///
/// Dimensions are fixed at construction; there is no resize.
#[derive(Debug, Clone)]
pub struct TextureSurface {
    image: RgbaImage,
    dirty: bool,
}

impl TextureSurface {
    /// Create a surface holding a copy of the model's original texture
    pub fn from_image(original: &RgbaImage) -> Self {
        Self {
            image: original.clone(),
            dirty: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major, first row first
    pub fn as_rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Draw `source` into `rect`, resampled to the rectangle's size.
    ///
    /// Opaque source pixels replace what is underneath; translucent ones
    /// blend over it. Anything outside the surface is clipped. A rectangle
    /// that rounds to zero width or height paints nothing.
    pub fn paint(&mut self, source: &RgbaImage, rect: PaintRect) {
        let x = rect.x.round() as i64;
        let y = rect.y.round() as i64;
        let w = rect.width.round() as i64;
        let h = rect.height.round() as i64;

        if w <= 0 || h <= 0 || source.width() == 0 || source.height() == 0 {
            return;
        }
        self.dirty = true;

        let x0 = x.clamp(0, self.image.width() as i64);
        let y0 = y.clamp(0, self.image.height() as i64);
        let x1 = x.saturating_add(w).clamp(0, self.image.width() as i64);
        let y1 = y.saturating_add(h).clamp(0, self.image.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        if (x0, y0, x1 - x0, y1 - y0) == (x, y, w, h) {
            // Fully on the surface, so no larger than it
            let scaled = resample(source, w as u32, h as u32);
            self.draw_over(&scaled, x, y);
            return;
        }

        // Only the visible part is sampled; the full rectangle may be huge
        let scale_x = source.width() as f64 / w as f64;
        let scale_y = source.height() as f64 / h as f64;
        for dy in y0..y1 {
            let v = ((dy - y) as f64 + 0.5) * scale_y - 0.5;
            for dx in x0..x1 {
                let u = ((dx - x) as f64 + 0.5) * scale_x - 0.5;
                let s = sample_bilinear(source, u, v);
                let d = self.image.get_pixel_mut(dx as u32, dy as u32);
                *d = blend_over(s, *d);
            }
        }
    }

    /// Source-over composite of `src` with its top-left corner at (x, y)
    fn draw_over(&mut self, src: &RgbaImage, x: i64, y: i64) {
        let dst_w = self.image.width() as i64;
        let dst_h = self.image.height() as i64;

        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + src.width() as i64).min(dst_w);
        let y1 = (y + src.height() as i64).min(dst_h);

        for dy in y0..y1 {
            for dx in x0..x1 {
                let s = *src.get_pixel((dx - x) as u32, (dy - y) as u32);
                let d = self.image.get_pixel_mut(dx as u32, dy as u32);
                *d = blend_over(s, *d);
            }
        }
    }

    /// Return and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Encode the current pixels as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut cursor = Cursor::new(Vec::new());
        self.image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    /// Encode the current pixels as a `data:image/png;base64,` URL
    pub fn to_data_url(&self) -> Result<String, image::ImageError> {
        let png = self.to_png()?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png);
        Ok(format!("data:image/png;base64,{}", encoded))
    }
}

/// Bilinear sample at source pixel coordinates (pixel centers on integers),
/// clamped to the image edges
fn sample_bilinear(image: &RgbaImage, u: f64, v: f64) -> Rgba<u8> {
    let max_x = image.width() - 1;
    let max_y = image.height() - 1;
    let u = u.clamp(0.0, max_x as f64);
    let v = v.clamp(0.0, max_y as f64);

    let x0 = u.floor() as u32;
    let y0 = v.floor() as u32;
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = u - x0 as f64;
    let fy = v - y0 as f64;

    let a = image.get_pixel(x0, y0);
    let b = image.get_pixel(x1, y0);
    let c = image.get_pixel(x0, y1);
    let d = image.get_pixel(x1, y1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = a[i] as f64 * (1.0 - fx) + b[i] as f64 * fx;
        let bottom = c[i] as f64 * (1.0 - fx) + d[i] as f64 * fx;
        out[i] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

/// Porter-Duff source-over on straight (non-premultiplied) RGBA8
#[inline]
fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da = dst[3] as u32;
    // out_a = sa + da * (1 - sa), scaled by 255
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
        out[c] = ((num + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = ((out_a + 127) / 255).min(255) as u8;
    Rgba(out)
}

#[cfg(test)]
impl TextureSurface {
    /// Create a blank (transparent) surface
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            dirty: false,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel at (x, y), or None outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Whether the surface changed since the last `take_dirty`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
