//! Configuration module for the deckprint service

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{PaperPreset, SheetConfig};

/// Main application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub fonts: FontSettings,
    pub symbols: SymbolSettings,
    #[serde(default)]
    pub sheet: SheetSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Font files for each face the renderers use
#[derive(Debug, Clone, Deserialize)]
pub struct FontSettings {
    pub heading_bold: PathBuf,
    pub body: PathBuf,
    pub body_bold: PathBuf,
}

/// Where mana symbol icons are loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolSourceKind {
    Dir,
    Http,
}

/// Mana symbol asset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolSettings {
    pub source: SymbolSourceKind,
    /// Directory of `<key>.png` files, for the `dir` source
    pub path: PathBuf,
    /// Base URL serving `<key>.png`, for the `http` source
    pub base_url: Option<String>,
}

/// Defaults for PDF requests that leave options out
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    pub paper: PaperPreset,
    pub duplex: bool,
    pub crop_marks: bool,
    pub back_offset_mm: f32,
}

impl Default for SheetSettings {
    fn default() -> Self {
        SheetSettings {
            paper: PaperPreset::Letter,
            duplex: false,
            crop_marks: true,
            back_offset_mm: 0.0,
        }
    }
}

/// Sheet session lifetime
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Sessions untouched for this long are dropped
    pub idle_ttl_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings { idle_ttl_secs: 3600 }
    }
}

impl SessionSettings {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }
}

impl SheetSettings {
    pub fn to_config(&self) -> SheetConfig {
        SheetConfig {
            paper: self.paper,
            duplex: self.duplex,
            crop_marks: self.crop_marks,
            back_offset_mm: self.back_offset_mm,
        }
    }
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with DECKPRINT_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // DECKPRINT_SERVER__PORT, DECKPRINT_SYMBOLS__SOURCE, etc.
            .add_source(
                Environment::with_prefix("DECKPRINT")
                    .separator("__")
                    .try_parsing(true)
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: None,
            },
            fonts: FontSettings {
                heading_bold: PathBuf::from("assets/fonts/DejaVuSansCondensed-Bold.ttf"),
                body: PathBuf::from("assets/fonts/DejaVuSans.ttf"),
                body_bold: PathBuf::from("assets/fonts/DejaVuSans-Bold.ttf"),
            },
            symbols: SymbolSettings {
                source: SymbolSourceKind::Dir,
                path: PathBuf::from("assets/symbols"),
                base_url: None,
            },
            sheet: SheetSettings::default(),
            sessions: SessionSettings::default(),
        }
    }
}
