//! Card Rendering
//!
//! [`layout::render_card`] turns (profile, products, theme) into a [`Card`]
//! scene. The same scene feeds the SVG preview and the raster capture, so
//! what is previewed is what gets exported.

pub mod layout;
pub mod raster;
pub mod svg;

use serde::Serialize;

use crate::themes::Color;

pub use layout::{render_card, CardOptions};
pub use raster::{rasterize, CaptureOptions};
pub use svg::to_svg;

/// Card width in CSS pixels
pub const CARD_WIDTH: f32 = 420.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Rect {
        frame: Frame,
        fill: Color,
        radius: f32,
    },
    Rule {
        x0: f32,
        x1: f32,
        y: f32,
        color: Color,
    },
    /// `x` is the anchor for `align`; `y` is the top of the line box
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        align: Align,
        bold: bool,
        content: String,
    },
    /// `fallback` fills the frame when `source` cannot be decoded
    Image {
        frame: Frame,
        source: String,
        radius: f32,
        fallback: Color,
    },
}

/// A fully laid out card, in CSS pixels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    pub border: Color,
    pub radius: f32,
    pub nodes: Vec<Node>,
}

impl Card {
    /// Every text run, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            Node::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}
