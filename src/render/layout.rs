//! Card layout: header, two-column product grid, footer.
//!
//! Text uses a fixed-pitch cell of `0.6 * size` by `1.2 * size`, matching
//! the rasterizer's glyph cells.

use crate::config::Settings;
use crate::products::Product;
use crate::profile::StoreProfile;
use crate::themes::Theme;

use super::{Align, Card, Frame, Node, CARD_WIDTH};

const PADDING: f32 = 32.0;
const GRID_GAP: f32 = 16.0;
const SECTION_GAP: f32 = 24.0;
const TILE_PADDING: f32 = 16.0;
const CARD_RADIUS: f32 = 32.0;
const TILE_RADIUS: f32 = 12.0;
const PHOTO_RADIUS: f32 = 8.0;
const NAME_SIZE: f32 = 14.0;
const PLAN_SIZE: f32 = 12.0;
const PLACEHOLDER_SIZE: f32 = 10.0;
const HAIRLINE_ALPHA: u8 = 26;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardOptions {
    pub show_photos: bool,
    pub currency_prefix: String,
}

impl CardOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_photos: settings.features.photos,
            currency_prefix: settings.currency_prefix.clone(),
        }
    }
}

impl Default for CardOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

pub fn advance(size: f32) -> f32 {
    size * 0.6
}

pub fn line_height(size: f32) -> f32 {
    size * 1.2
}

fn max_chars(width: f32, size: f32) -> usize {
    (width / advance(size)).floor().max(0.0) as usize
}

/// Truncate with an ellipsis so the text fits `width`
pub fn fit_text(text: &str, width: f32, size: f32) -> String {
    let max = max_chars(width, size);
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    if max < 4 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

/// Greedy word wrap; words longer than a line are split
pub fn wrap_text(text: &str, width: f32, size: f32) -> Vec<String> {
    let max = max_chars(width, size).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if current.is_empty() { word.len() } else { current.chars().count() + 1 + word.len() };
        if needed > max && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn text(x: f32, y: f32, size: f32, color: crate::themes::Color, align: Align, bold: bool, content: String) -> Node {
    Node::Text { x, y, size, color, align, bold, content }
}

fn photo_height(inner_width: f32) -> f32 {
    (inner_width * 0.75).round()
}

fn tile_height(profile: &StoreProfile, options: &CardOptions, inner_width: f32) -> f32 {
    let photo = if options.show_photos { photo_height(inner_width) + 8.0 } else { 0.0 };
    TILE_PADDING * 2.0
        + photo
        + line_height(NAME_SIZE)
        + line_height(PLAN_SIZE)
        + 8.0
        + line_height(profile.price_size as f32)
}

fn push_tile(
    nodes: &mut Vec<Node>,
    frame: Frame,
    product: &Product,
    profile: &StoreProfile,
    theme: &Theme,
    options: &CardOptions,
) {
    nodes.push(Node::Rect { frame, fill: theme.card, radius: TILE_RADIUS });

    let x = frame.x + TILE_PADDING;
    let inner = frame.width - TILE_PADDING * 2.0;
    let mut y = frame.y + TILE_PADDING;

    if options.show_photos {
        let photo = Frame::new(x, y, inner, photo_height(inner));
        let slot = theme.muted.with_alpha(40);
        match &product.image {
            Some(source) => nodes.push(Node::Image {
                frame: photo,
                source: source.clone(),
                radius: PHOTO_RADIUS,
                fallback: slot,
            }),
            None => {
                nodes.push(Node::Rect {
                    frame: photo,
                    fill: slot,
                    radius: PHOTO_RADIUS,
                });
                nodes.push(text(
                    photo.x + photo.width / 2.0,
                    photo.y + (photo.height - line_height(PLACEHOLDER_SIZE)) / 2.0,
                    PLACEHOLDER_SIZE,
                    theme.muted,
                    Align::Center,
                    false,
                    "NO IMAGE".to_string(),
                ));
            }
        }
        y += photo.height + 8.0;
    }

    nodes.push(text(x, y, NAME_SIZE, theme.text, Align::Start, true, fit_text(&product.name, inner, NAME_SIZE)));
    y += line_height(NAME_SIZE);
    nodes.push(text(x, y, PLAN_SIZE, theme.muted, Align::Start, false, fit_text(&product.plan, inner, PLAN_SIZE)));
    y += line_height(PLAN_SIZE) + 8.0;

    let price_size = profile.price_size as f32;
    let price = if options.currency_prefix.is_empty() {
        product.price.clone()
    } else {
        format!("{} {}", options.currency_prefix, product.price)
    };
    nodes.push(text(
        frame.right() - TILE_PADDING,
        y,
        price_size,
        theme.accent,
        Align::End,
        true,
        fit_text(&price, inner, price_size),
    ));
}

/// Lay out the card. Identical inputs always give an identical card.
pub fn render_card(
    profile: &StoreProfile,
    products: &[Product],
    theme: &Theme,
    options: &CardOptions,
) -> Card {
    let mut nodes = Vec::new();
    let inner = CARD_WIDTH - PADDING * 2.0;
    let center = CARD_WIDTH / 2.0;
    let hairline = theme.text.with_alpha(HAIRLINE_ALPHA);
    let mut y = PADDING;

    let title_size = profile.title_size as f32;
    for line in wrap_text(&profile.name.to_uppercase(), inner, title_size) {
        nodes.push(text(center, y, title_size, theme.text, Align::Center, true, line));
        y += line_height(title_size);
    }
    y += 4.0;

    let tagline_size = profile.tagline_size as f32;
    nodes.push(text(
        center,
        y,
        tagline_size,
        theme.muted,
        Align::Center,
        false,
        fit_text(&profile.tagline, inner, tagline_size),
    ));
    y += line_height(tagline_size) + SECTION_GAP;

    let column = (inner - GRID_GAP) / 2.0;
    let tile = tile_height(profile, options, column - TILE_PADDING * 2.0);
    for (i, product) in products.iter().enumerate() {
        let col = (i % 2) as f32;
        let row = (i / 2) as f32;
        let frame = Frame::new(
            PADDING + col * (column + GRID_GAP),
            y + row * (tile + GRID_GAP),
            column,
            tile,
        );
        push_tile(&mut nodes, frame, product, profile, theme, options);
    }
    let rows = products.len().div_ceil(2);
    if rows > 0 {
        y += rows as f32 * tile + (rows - 1) as f32 * GRID_GAP;
    }
    y += SECTION_GAP;

    nodes.push(Node::Rule { x0: PADDING, x1: CARD_WIDTH - PADDING, y, color: hairline });
    y += 16.0;

    let footer_size = profile.footer_size as f32;
    let half = inner / 2.0 - 8.0;
    nodes.push(text(
        PADDING,
        y,
        footer_size,
        theme.muted,
        Align::Start,
        false,
        fit_text(&profile.instagram, half, footer_size),
    ));
    nodes.push(text(
        CARD_WIDTH - PADDING,
        y,
        footer_size,
        theme.muted,
        Align::End,
        false,
        fit_text(&profile.whatsapp, half, footer_size),
    ));
    y += line_height(footer_size) + PADDING;

    Card {
        width: CARD_WIDTH,
        height: y.ceil(),
        background: theme.bg,
        border: hairline,
        radius: CARD_RADIUS,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::ProductList;
    use crate::themes::ThemeKey;

    fn seeded_card(options: &CardOptions) -> Card {
        render_card(
            &StoreProfile::default(),
            ProductList::seeded().as_slice(),
            ThemeKey::Gold.theme(),
            options,
        )
    }

    #[test]
    fn test_fit_text() {
        assert_eq!(fit_text("Netflix", 100.0, 10.0), "Netflix");
        assert_eq!(fit_text("abcdefghijklmnop", 60.0, 10.0), "abcdefg...");
        assert_eq!(fit_text("abcdef", 18.0, 10.0), "abc");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("LUXE DIGITAL STORE", 60.0, 10.0), vec!["LUXE", "DIGITAL", "STORE"]);
        assert_eq!(wrap_text("aaaaaaaaaaaaa", 60.0, 10.0), vec!["aaaaaaaaaa", "aaa"]);
        assert!(wrap_text("   ", 60.0, 10.0).is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let options = CardOptions::default();
        assert_eq!(seeded_card(&options), seeded_card(&options));
    }

    #[test]
    fn test_card_contents() {
        let card = seeded_card(&CardOptions::default());
        let texts: Vec<_> = card.texts().collect();
        assert!(texts.contains(&"LUXE DIGITAL STORE"));
        assert!(texts.contains(&"Premium Digital Subscription"));
        assert!(texts.contains(&"Rp 35.000"));
        assert!(texts.contains(&"Spotify Premium"));
        assert!(texts.contains(&"@luxedigital"));
        assert!(texts.contains(&"0812-3456-7890"));
        assert_eq!(card.width, CARD_WIDTH);
    }

    #[test]
    fn test_tiles_share_a_row() {
        let card = seeded_card(&CardOptions::default());
        let tiles: Vec<Frame> = card
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Rect { frame, radius, .. } if *radius == TILE_RADIUS => Some(*frame),
                _ => None,
            })
            .collect();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].y, tiles[1].y);
        assert!(tiles[0].x < tiles[1].x);
    }

    #[test]
    fn test_photos_toggle_changes_height() {
        let with = seeded_card(&CardOptions::default());
        let without = seeded_card(&CardOptions { show_photos: false, ..CardOptions::default() });
        assert!(without.height < with.height);
        assert!(!without.texts().any(|t| t == "NO IMAGE"));
        assert_eq!(with.texts().filter(|t| *t == "NO IMAGE").count(), 2);
    }

    #[test]
    fn test_more_products_grow_card() {
        let mut list = ProductList::seeded();
        let small = render_card(&StoreProfile::default(), list.as_slice(), ThemeKey::Gold.theme(), &CardOptions::default());
        list.add(&Default::default(), &crate::products::SystemClock);
        let large = render_card(&StoreProfile::default(), list.as_slice(), ThemeKey::Gold.theme(), &CardOptions::default());
        assert!(large.height > small.height);
    }
}
