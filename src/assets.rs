//! Image asset loading for photos and stickers

use std::fmt;
use std::path::Path;

use image::RgbaImage;

use crate::net::NetError;

/// Failure to load an image asset
#[derive(Debug)]
pub enum AssetError {
    /// File could not be read
    Io(std::io::Error),
    /// Bytes are not a supported image
    Decode(image::ImageError),
    /// Remote image could not be downloaded
    Fetch(NetError),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "IO error: {}", e),
            AssetError::Decode(e) => write!(f, "Image decode error: {}", e),
            AssetError::Fetch(e) => write!(f, "Fetch error: {}", e),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::Decode(e)
    }
}

impl From<NetError> for AssetError {
    fn from(e: NetError) -> Self {
        AssetError::Fetch(e)
    }
}

/// Decode PNG/JPEG/BMP bytes into RGBA8
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Read and decode an image file.
///
/// An empty path is just a missing file.
pub fn load_image_file(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}
