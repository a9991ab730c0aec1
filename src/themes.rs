//! Theme Catalog - Fixed Palettes
//!
//! Five named palettes. Exactly one is active per session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Unknown theme: {0}")]
    Unknown(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(s: &str) -> Result<Self, ThemeError> {
        let invalid = || ThemeError::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                Color::from_hex(&format!("#{}", expanded))
            }
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?).with_alpha(channel(6)?)),
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Opacity in 0..=1 for markup output
    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "{}{:02x}", self.to_hex(), self.a)
        }
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = ThemeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    #[default]
    Gold,
    Emerald,
    Rose,
    Ocean,
    Classic,
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 5] = [
        ThemeKey::Gold,
        ThemeKey::Emerald,
        ThemeKey::Rose,
        ThemeKey::Ocean,
        ThemeKey::Classic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKey::Gold => "gold",
            ThemeKey::Emerald => "emerald",
            ThemeKey::Rose => "rose",
            ThemeKey::Ocean => "ocean",
            ThemeKey::Classic => "classic",
        }
    }

    pub fn theme(&self) -> &'static Theme {
        ThemeCatalog::get(*self)
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeKey {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ThemeError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub key: ThemeKey,
    pub name: &'static str,
    pub bg: Color,
    pub card: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
}

const CATALOG: [Theme; 5] = [
    Theme {
        key: ThemeKey::Gold,
        name: "Gold Luxe",
        bg: Color::rgb(0x00, 0x00, 0x00),
        card: Color::rgb(0x17, 0x17, 0x17),
        accent: Color::rgb(0xf5, 0x9e, 0x0b),
        text: Color::rgb(0xff, 0xff, 0xff),
        muted: Color::rgb(0xa3, 0xa3, 0xa3),
    },
    Theme {
        key: ThemeKey::Emerald,
        name: "Emerald",
        bg: Color::rgb(0x02, 0x2c, 0x22),
        card: Color::rgb(0x06, 0x4e, 0x3b),
        accent: Color::rgb(0x34, 0xd3, 0x99),
        text: Color::rgb(0xec, 0xfd, 0xf5),
        muted: Color::rgb(0x6e, 0xe7, 0xb7),
    },
    Theme {
        key: ThemeKey::Rose,
        name: "Rose Noir",
        bg: Color::rgb(0x1c, 0x0a, 0x10),
        card: Color::rgb(0x3b, 0x0d, 0x1c),
        accent: Color::rgb(0xfb, 0x71, 0x85),
        text: Color::rgb(0xff, 0xf1, 0xf2),
        muted: Color::rgb(0xfd, 0xa4, 0xaf),
    },
    Theme {
        key: ThemeKey::Ocean,
        name: "Deep Ocean",
        bg: Color::rgb(0x0b, 0x11, 0x20),
        card: Color::rgb(0x1e, 0x29, 0x3b),
        accent: Color::rgb(0x38, 0xbd, 0xf8),
        text: Color::rgb(0xf0, 0xf9, 0xff),
        muted: Color::rgb(0x94, 0xa3, 0xb8),
    },
    Theme {
        key: ThemeKey::Classic,
        name: "Classic Light",
        bg: Color::rgb(0xff, 0xff, 0xff),
        card: Color::rgb(0xf5, 0xf5, 0xf5),
        accent: Color::rgb(0x11, 0x11, 0x11),
        text: Color::rgb(0x17, 0x17, 0x17),
        muted: Color::rgb(0x73, 0x73, 0x73),
    },
];

/// Fixed theme catalog
pub struct ThemeCatalog;

impl ThemeCatalog {
    pub fn get(key: ThemeKey) -> &'static Theme {
        match key {
            ThemeKey::Gold => &CATALOG[0],
            ThemeKey::Emerald => &CATALOG[1],
            ThemeKey::Rose => &CATALOG[2],
            ThemeKey::Ocean => &CATALOG[3],
            ThemeKey::Classic => &CATALOG[4],
        }
    }

    pub fn lookup(key: &str) -> Result<&'static Theme, ThemeError> {
        Ok(Self::get(key.parse()?))
    }

    pub fn list() -> &'static [Theme] {
        &CATALOG
    }
}
