//! Software rasterizer for [`Card`] scenes.
//!
//! Coverage is sampled at pixel centers without anti-aliasing, so the same
//! card and options always produce byte-identical pixels.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use tracing::warn;

use crate::config::{Background, ExportSettings};
use crate::media::decode_data_uri;
use crate::themes::Color;

use super::layout::advance;
use super::{Align, Card, Frame, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Device pixels per CSS pixel
    pub scale: u32,
    /// Canvas fill, visible outside the card's rounded corners
    pub background: Color,
}

impl CaptureOptions {
    pub fn for_card(settings: &ExportSettings, card: &Card) -> Self {
        let background = match settings.background {
            Background::Theme => card.background,
            Background::Fixed(color) => color,
        };
        Self { scale: settings.scale, background }
    }
}

fn blend(dst: &mut Rgba<u8>, color: Color) {
    let a = color.a as f32 / 255.0;
    if a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    let mix = |src: u8, dst: u8| -> u8 {
        let v = (src as f32 * a + dst as f32 * dst_a * (1.0 - a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}

fn put(canvas: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    blend(canvas.get_pixel_mut(x as u32, y as u32), color);
}

fn scaled(frame: &Frame, s: f32) -> Frame {
    Frame::new(frame.x * s, frame.y * s, frame.width * s, frame.height * s)
}

fn inside_rounded(x: f32, y: f32, frame: &Frame, radius: f32) -> bool {
    if x < frame.x || x >= frame.right() || y < frame.y || y >= frame.bottom() {
        return false;
    }
    let r = radius.min(frame.width / 2.0).min(frame.height / 2.0).max(0.0);
    let cx = x.clamp(frame.x + r, frame.right() - r);
    let cy = y.clamp(frame.y + r, frame.bottom() - r);
    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy <= r * r
}

/// Pixel range covering `frame`, clipped to the canvas
fn pixel_bounds(canvas: &RgbaImage, frame: &Frame) -> (u32, u32, u32, u32) {
    let clip = |v: f32, max: u32| v.max(0.0).min(max as f32) as u32;
    (
        clip(frame.x.floor(), canvas.width()),
        clip(frame.y.floor(), canvas.height()),
        clip(frame.right().ceil(), canvas.width()),
        clip(frame.bottom().ceil(), canvas.height()),
    )
}

/// Fill the rounded `outer` shape, minus the rounded `hole` if given
fn fill_shape(
    canvas: &mut RgbaImage,
    outer: &Frame,
    radius: f32,
    hole: Option<(&Frame, f32)>,
    color: Color,
) {
    let (x0, y0, x1, y1) = pixel_bounds(canvas, outer);
    for py in y0..y1 {
        for px in x0..x1 {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            if !inside_rounded(cx, cy, outer, radius) {
                continue;
            }
            if let Some((inner, inner_radius)) = hole {
                if inside_rounded(cx, cy, inner, inner_radius) {
                    continue;
                }
            }
            blend(canvas.get_pixel_mut(px, py), color);
        }
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(canvas: &mut RgbaImage, node: &Node, s: f32) {
    let Node::Text { x, y, size, color, align, bold, content } = node else {
        return;
    };
    let pitch = advance(*size);
    let width = content.chars().count() as f32 * pitch;
    let start = match align {
        Align::Start => *x,
        Align::Center => *x - width / 2.0,
        Align::End => *x - width,
    };

    let cell_w = pitch * s;
    let cell_h = size * s;
    if cell_w < 1.0 || cell_h < 1.0 {
        return;
    }
    let top = ((y + size * 0.1) * s).round() as i64;
    let cols = cell_w.ceil() as i64;
    let rows = cell_h.ceil() as i64;
    let weight: i64 = if *bold { (s.round() as i64).max(1) } else { 0 };

    for (i, c) in content.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let bitmap = glyph(c);
        let left = ((start + i as f32 * pitch) * s).round() as i64;
        for py in 0..rows {
            let gy = ((py as f32 * 8.0 / cell_h) as usize).min(7);
            let row = bitmap[gy];
            for px in 0..cols {
                let gx = ((px as f32 * 8.0 / cell_w) as usize).min(7);
                if row >> gx & 1 == 0 {
                    continue;
                }
                for dx in 0..=weight {
                    put(canvas, left + px + dx, top + py, *color);
                }
            }
        }
    }
}

fn draw_image(canvas: &mut RgbaImage, frame: &Frame, radius: f32, source: &str, fallback: Color) {
    let decoded = match decode_data_uri(source) {
        Ok(img) => img,
        Err(e) => {
            warn!(error = %e, "skipping undecodable product image");
            fill_shape(canvas, frame, radius, None, fallback);
            return;
        }
    };
    let (x0, y0, x1, y1) = pixel_bounds(canvas, frame);
    let left = frame.x.floor().max(0.0) as u32;
    let top = frame.y.floor().max(0.0) as u32;
    let width = frame.width.ceil().max(1.0) as u32;
    let height = frame.height.ceil().max(1.0) as u32;
    let fitted = decoded.resize_to_fill(width, height, FilterType::Triangle).to_rgba8();

    for py in y0..y1 {
        for px in x0..x1 {
            if !inside_rounded(px as f32 + 0.5, py as f32 + 0.5, frame, radius) {
                continue;
            }
            let Some(src) = fitted.get_pixel_checked(px - left, py - top) else {
                continue;
            };
            let color = Color::rgb(src[0], src[1], src[2]).with_alpha(src[3]);
            blend(canvas.get_pixel_mut(px, py), color);
        }
    }
}

/// Paint `card` onto a fresh bitmap at `options.scale`
pub fn rasterize(card: &Card, options: &CaptureOptions) -> RgbaImage {
    let s = options.scale.max(1) as f32;
    let width = (card.width * s).ceil() as u32;
    let height = (card.height * s).ceil() as u32;
    let bg = options.background;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([bg.r, bg.g, bg.b, bg.a]));

    let outer = Frame::new(0.0, 0.0, card.width * s, card.height * s);
    let radius = card.radius * s;
    fill_shape(&mut canvas, &outer, radius, None, card.background);
    let inset = Frame::new(s, s, outer.width - 2.0 * s, outer.height - 2.0 * s);
    fill_shape(&mut canvas, &outer, radius, Some((&inset, radius - s)), card.border);

    for node in &card.nodes {
        match node {
            Node::Rect { frame, fill, radius } => {
                fill_shape(&mut canvas, &scaled(frame, s), radius * s, None, *fill);
            }
            Node::Rule { x0, x1, y, color } => {
                let rule = Frame::new(x0 * s, y * s, (x1 - x0) * s, s.round().max(1.0));
                fill_shape(&mut canvas, &rule, 0.0, None, *color);
            }
            Node::Text { .. } => draw_text(&mut canvas, node, s),
            Node::Image { frame, source, radius, fallback } => {
                draw_image(&mut canvas, &scaled(frame, s), radius * s, source, *fallback);
            }
        }
    }

    canvas
}
