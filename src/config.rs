//! Session Configuration
//!
//! Settings come from an optional TOML file with serde defaults for every
//! field. The public flag is derived exactly once from the initial query
//! string and lives on [`SessionConfig`], never in a global.
//!
//! ```toml
//! currency_prefix = "Rp"
//! default_theme = "gold"
//!
//! [features]
//! theming = true
//! photos = true
//! font_controls = true
//!
//! [export]
//! scale = 3
//! jpeg_quality = 100
//! background = "theme"   # or a fixed color such as "#000000"
//!
//! [defaults]
//! name = "New Product"
//! plan = "Plan"
//! price = "0"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::themes::{Color, ThemeError, ThemeKey};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

fn default_true() -> bool { true }
fn default_currency_prefix() -> String { "Rp".to_string() }
fn default_scale() -> u32 { 3 }
fn default_jpeg_quality() -> u8 { 100 }
fn default_png_name() -> String { "pricelist.png".to_string() }
fn default_pdf_name() -> String { "pricelist.pdf".to_string() }
fn default_product_name() -> String { "New Product".to_string() }
fn default_product_plan() -> String { "Plan".to_string() }
fn default_product_price() -> String { "0".to_string() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
    #[serde(default)]
    pub default_theme: ThemeKey,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub defaults: ProductDefaults,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_prefix: default_currency_prefix(),
            default_theme: ThemeKey::default(),
            features: Features::default(),
            export: ExportSettings::default(),
            defaults: ProductDefaults::default(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.check()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading settings");
        Self::from_toml_str(&content)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if !(1..=8).contains(&self.export.scale) {
            return Err(ConfigError::Invalid(format!(
                "export.scale must be between 1 and 8, got {}",
                self.export.scale
            )));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "export.jpeg_quality must be between 1 and 100, got {}",
                self.export.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Switches that unify the plain and themed editor variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default = "default_true")]
    pub theming: bool,
    #[serde(default = "default_true")]
    pub photos: bool,
    #[serde(default = "default_true")]
    pub font_controls: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self { theming: true, photos: true, font_controls: true }
    }
}

/// Canvas fill behind the card during capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Background {
    #[default]
    Theme,
    Fixed(Color),
}

impl From<Background> for String {
    fn from(b: Background) -> Self {
        match b {
            Background::Theme => "theme".to_string(),
            Background::Fixed(c) => c.to_string(),
        }
    }
}

impl TryFrom<String> for Background {
    type Error = ThemeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "theme" {
            Ok(Background::Theme)
        } else {
            Color::from_hex(&s).map(Background::Fixed)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub background: Background,
    #[serde(default = "default_png_name")]
    pub png_name: String,
    #[serde(default = "default_pdf_name")]
    pub pdf_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            jpeg_quality: default_jpeg_quality(),
            background: Background::Theme,
            png_name: default_png_name(),
            pdf_name: default_pdf_name(),
        }
    }
}

/// Field values for a freshly added product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDefaults {
    #[serde(default = "default_product_name")]
    pub name: String,
    #[serde(default = "default_product_plan")]
    pub plan: String,
    #[serde(default = "default_product_price")]
    pub price: String,
}

impl Default for ProductDefaults {
    fn default() -> Self {
        Self {
            name: default_product_name(),
            plan: default_product_plan(),
            price: default_product_price(),
        }
    }
}

/// Returns true when the query carries `view=public`.
///
/// Only the first `view` pair counts. Accepts the query with or without
/// its leading `?`.
pub fn is_public_query(query: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "view")
        .map_or(false, |(_, value)| value == "public")
}

/// Configuration fixed at session start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    public: bool,
    pub settings: Settings,
}

impl SessionConfig {
    pub fn resolve(settings: Settings, query: &str) -> Self {
        let public = is_public_query(query);
        debug!(public, "resolved view mode");
        Self { public, settings }
    }

    pub fn from_url(settings: Settings, url: &Url) -> Self {
        Self::resolve(settings, url.query().unwrap_or_default())
    }

    pub fn editing(settings: Settings) -> Self {
        Self { public: false, settings }
    }

    pub fn is_public(&self) -> bool {
        self.public
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::editing(Settings::default())
    }
}
