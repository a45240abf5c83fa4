//! Studio configuration
//!
//! Where the design server lives and where the static assets are. Stored as
//! RON; every field has a default so a partial file (or none at all) works.
//!
//! Lookup order:
//! 1. `./mug-studio.ron`
//! 2. `<config dir>/mug-studio/config.ron`
//! 3. built-in defaults

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compositor::StickerKind;
use crate::model::DEFAULT_MESH_NAME;

/// Config file looked for in the working directory
pub const LOCAL_CONFIG_FILE: &str = "mug-studio.ron";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Base URL of the design server (no trailing slash needed)
    pub server_url: String,
    /// Path of the mug model asset
    pub model_path: PathBuf,
    /// Name of the paintable sub-mesh inside the model
    pub mesh_name: String,
    /// Heart sticker image
    pub heart_sticker: PathBuf,
    /// Cat sticker image
    pub cat_sticker: PathBuf,
    /// Idle auto-rotation of the preview, radians per second (0 = off)
    pub auto_rotate: f32,
    /// Connect/read timeout for server requests
    pub timeout_secs: u64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            model_path: PathBuf::from("static/models/cat_mug.glb"),
            mesh_name: DEFAULT_MESH_NAME.to_string(),
            heart_sticker: PathBuf::from("static/images/sticker_heart.png"),
            cat_sticker: PathBuf::from("static/images/sticker_cat.png"),
            auto_rotate: 0.3,
            timeout_secs: 30,
        }
    }
}

impl StudioConfig {
    /// Asset path for a sticker kind attribute.
    ///
    /// Unknown kinds resolve to an empty path, which fails to load.
    pub fn sticker_path(&self, kind_attr: &str) -> PathBuf {
        match StickerKind::from_attr(kind_attr) {
            Some(StickerKind::Heart) => self.heart_sticker.clone(),
            Some(StickerKind::Cat) => self.cat_sticker.clone(),
            None => PathBuf::new(),
        }
    }

    /// Parse a config from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Find and load the config, falling back to defaults.
    ///
    /// A file that exists but cannot be parsed is reported and ignored.
    pub fn discover() -> Self {
        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Ignoring config {}: {}", path.display(), e);
                }
            }
        }
        log::info!("No config file found, using defaults");
        Self::default()
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("mug-studio").join("config.ron"));
        }
        paths
    }
}

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = StudioConfig::from_ron(r#"(server_url: "http://mugs.example:9000")"#).unwrap();
        assert_eq!(config.server_url, "http://mugs.example:9000");
        assert_eq!(config.mesh_name, "MugBody");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ron");
        fs::write(&path, "(\n  mesh_name: \"Body\",\n  auto_rotate: 0.0,\n)\n").unwrap();

        let expected = StudioConfig {
            mesh_name: "Body".to_string(),
            auto_rotate: 0.0,
            ..Default::default()
        };
        assert_eq!(StudioConfig::load(&path).unwrap(), expected);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = StudioConfig::load(dir.path().join("absent.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let err = StudioConfig::from_ron("(server_url: 42)").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_sticker_paths() {
        let config = StudioConfig::default();
        assert_eq!(config.sticker_path("heart"), config.heart_sticker);
        assert_eq!(config.sticker_path("cat"), config.cat_sticker);
        assert_eq!(config.sticker_path("unicorn"), PathBuf::new());
    }
}
