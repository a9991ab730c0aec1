//! SVG markup for a [`Card`], used as the on-screen preview

use std::fmt::Write;

use crate::themes::Color;

use super::{Align, Card, Node};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn paint(attr: &str, color: Color) -> String {
    if color.a == 255 {
        format!(r#"{}="{}""#, attr, color.to_hex())
    } else {
        format!(r#"{}="{}" {}-opacity="{:.3}""#, attr, color.to_hex(), attr, color.opacity())
    }
}

/// Render the card as a standalone SVG document
pub fn to_svg(card: &Card) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_svg(&mut out, card);
    out
}

fn write_svg(out: &mut String, card: &Card) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" id="canvas">"#,
        w = card.width,
        h = card.height
    )?;
    writeln!(
        out,
        r#"<rect x="0.5" y="0.5" width="{}" height="{}" rx="{}" {} {}/>"#,
        card.width - 1.0,
        card.height - 1.0,
        card.radius,
        paint("fill", card.background),
        paint("stroke", card.border)
    )?;

    for (i, node) in card.nodes.iter().enumerate() {
        match node {
            Node::Rect { frame, fill, radius } => writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" {}/>"#,
                frame.x,
                frame.y,
                frame.width,
                frame.height,
                radius,
                paint("fill", *fill)
            )?,
            Node::Rule { x0, x1, y, color } => writeln!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
                x0,
                y,
                x1,
                y,
                paint("stroke", *color)
            )?,
            Node::Text { x, y, size, color, align, bold, content } => {
                let anchor = match align {
                    Align::Start => "start",
                    Align::Center => "middle",
                    Align::End => "end",
                };
                writeln!(
                    out,
                    r#"<text x="{}" y="{}" font-family="monospace" font-size="{}" font-weight="{}" text-anchor="{}" dominant-baseline="hanging" {}>{}</text>"#,
                    x,
                    y + size * 0.1,
                    size,
                    if *bold { "bold" } else { "normal" },
                    anchor,
                    paint("fill", *color),
                    escape(content)
                )?
            }
            Node::Image { frame, source, radius, fallback } => {
                writeln!(
                    out,
                    r#"<clipPath id="photo-{i}"><rect x="{}" y="{}" width="{}" height="{}" rx="{}"/></clipPath>"#,
                    frame.x, frame.y, frame.width, frame.height, radius
                )?;
                writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" {}/>"#,
                    frame.x,
                    frame.y,
                    frame.width,
                    frame.height,
                    radius,
                    paint("fill", *fallback)
                )?;
                writeln!(
                    out,
                    r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#photo-{i})" href="{}"/>"#,
                    frame.x,
                    frame.y,
                    frame.width,
                    frame.height,
                    escape(source)
                )?
            }
        }
    }

    writeln!(out, "</svg>")
}
