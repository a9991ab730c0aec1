//! Store Profile - shop identity and font-size overrides

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

/// Accepted font sizes in pixels; writes are clamped into this range.
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 8..=72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Name,
    Tagline,
    Instagram,
    Whatsapp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeField {
    Title,
    Tagline,
    Price,
    Footer,
}

impl SizeField {
    pub const ALL: [SizeField; 4] = [
        SizeField::Title,
        SizeField::Tagline,
        SizeField::Price,
        SizeField::Footer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SizeField::Title => "Title",
            SizeField::Tagline => "Tagline",
            SizeField::Price => "Price",
            SizeField::Footer => "Footer",
        }
    }
}

fn default_title_size() -> u32 { 30 }
fn default_tagline_size() -> u32 { 12 }
fn default_price_size() -> u32 { 16 }
fn default_footer_size() -> u32 { 12 }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProfile {
    pub name: String,
    pub tagline: String,
    pub instagram: String,
    pub whatsapp: String,
    #[serde(default = "default_title_size")]
    pub title_size: u32,
    #[serde(default = "default_tagline_size")]
    pub tagline_size: u32,
    #[serde(default = "default_price_size")]
    pub price_size: u32,
    #[serde(default = "default_footer_size")]
    pub footer_size: u32,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            name: "LUXE DIGITAL STORE".to_string(),
            tagline: "Premium Digital Subscription".to_string(),
            instagram: "@luxedigital".to_string(),
            whatsapp: "0812-3456-7890".to_string(),
            title_size: default_title_size(),
            tagline_size: default_tagline_size(),
            price_size: default_price_size(),
            footer_size: default_footer_size(),
        }
    }
}

impl StoreProfile {
    pub fn text(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Tagline => &self.tagline,
            ProfileField::Instagram => &self.instagram,
            ProfileField::Whatsapp => &self.whatsapp,
        }
    }

    /// Replace one text field. Any string is accepted, including empty.
    pub fn set_text(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Tagline => &mut self.tagline,
            ProfileField::Instagram => &mut self.instagram,
            ProfileField::Whatsapp => &mut self.whatsapp,
        };
        *slot = value.into();
        debug!(?field, "profile text updated");
    }

    pub fn size(&self, field: SizeField) -> u32 {
        match field {
            SizeField::Title => self.title_size,
            SizeField::Tagline => self.tagline_size,
            SizeField::Price => self.price_size,
            SizeField::Footer => self.footer_size,
        }
    }

    /// Replace one size field, clamped into [`FONT_SIZE_RANGE`].
    /// Returns the value actually stored.
    pub fn set_size(&mut self, field: SizeField, value: u32) -> u32 {
        let applied = clamp_font_size(value);
        let slot = match field {
            SizeField::Title => &mut self.title_size,
            SizeField::Tagline => &mut self.tagline_size,
            SizeField::Price => &mut self.price_size,
            SizeField::Footer => &mut self.footer_size,
        };
        *slot = applied;
        debug!(?field, requested = value, applied, "profile size updated");
        applied
    }

    /// Copy with every size forced into range
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        for field in SizeField::ALL {
            out.set_size(field, self.size(field));
        }
        out
    }
}

pub fn clamp_font_size(value: u32) -> u32 {
    value.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end())
}
