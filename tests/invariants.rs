//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::collections::HashSet;

use pricelist_core::{
    config::{SessionConfig, Settings},
    page::PageTemplate,
    products::IdClock,
    render::to_svg,
    render_page, ProductField, ProductId, ProfileField, Session, SizeField, ThemeKey, ViewGate,
    ViewMode,
};

/// Every call returns the same millisecond
struct StuckClock;

impl IdClock for StuckClock {
    fn now_millis(&self) -> u64 {
        1_700_000_000_000
    }
}

fn ids(session: &Session) -> Vec<ProductId> {
    session.products().iter().map(|p| p.id).collect()
}

fn assert_distinct(session: &Session) {
    let all = ids(session);
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len(), "duplicate ids in {:?}", all);
}

#[test]
fn invariant_ids_distinct_across_mixed_operations() {
    let mut session = Session::default();
    session.set_clock(Box::new(StuckClock));

    let a = session.add_product();
    let b = session.add_product();
    session.remove_product(ProductId(1));
    session.update_product(a, ProductField::Name, "Disney+");
    let c = session.add_product();
    session.remove_product(b);
    let d = session.add_product();

    assert_distinct(&session);
    // insertion order minus removed entries
    assert_eq!(ids(&session), vec![ProductId(2), a, c, d]);
}

#[test]
fn invariant_three_quick_adds() {
    let mut session = Session::default();
    session.set_clock(Box::new(StuckClock));
    let before = session.products().len();

    for _ in 0..3 {
        session.add_product();
    }

    assert_eq!(session.products().len(), before + 3);
    assert_distinct(&session);
    for p in &session.products()[before..] {
        assert_eq!(p.name, "New Product");
        assert_eq!(p.plan, "Plan");
        assert_eq!(p.price, "0");
        assert_eq!(p.image, None);
    }
}

#[test]
fn invariant_configured_defaults_for_new_products() {
    let mut settings = Settings::default();
    settings.defaults.name = "Produk Baru".to_string();
    let mut session = Session::new(SessionConfig::editing(settings));

    let id = session.add_product();
    let added = session.products().last().unwrap();
    assert_eq!(added.id, id);
    assert_eq!(added.name, "Produk Baru");
}

#[test]
fn invariant_update_touches_one_field_of_one_product() {
    let mut session = Session::default();
    let before = session.products().to_vec();

    session.update_product(ProductId(1), ProductField::Plan, "3 Bulan");

    let after = session.products();
    assert_eq!(after[0].plan, "3 Bulan");
    assert_eq!(after[0].name, before[0].name);
    assert_eq!(after[0].price, before[0].price);
    assert_eq!(after[0].image, before[0].image);
    assert_eq!(after[1], before[1]);
}

#[test]
fn invariant_unknown_ids_are_noops() {
    let mut session = Session::default();
    let before = session.products().to_vec();

    session.update_product(ProductId(404), ProductField::Price, "1");
    session.remove_product(ProductId(404));
    session.clear_image(ProductId(404));

    assert_eq!(session.products(), before.as_slice());
}

#[test]
fn scenario_remove_first_seed_product() {
    let mut session = Session::default();
    let first = session.products()[0].id;
    session.remove_product(first);

    assert_eq!(session.products().len(), 1);
    assert_eq!(session.products()[0].name, "Spotify Premium");
    assert_eq!(session.products()[0].price, "20.000");
}

#[test]
fn scenario_theme_switch_keeps_text() {
    let mut session = Session::default();
    assert_eq!(session.theme().key, ThemeKey::Gold);
    let gold = session.card();

    session.set_theme_by_name("emerald").unwrap();
    let emerald = session.card();
    let palette = ThemeKey::Emerald.theme();

    assert_eq!(emerald.background, palette.bg);
    assert_ne!(gold.background, emerald.background);
    assert_eq!(gold.texts().collect::<Vec<_>>(), emerald.texts().collect::<Vec<_>>());

    let svg = to_svg(&emerald);
    assert!(svg.contains(&format!(r#"fill="{}""#, palette.accent.to_hex())));
    assert!(svg.contains(&format!(r#"fill="{}""#, palette.muted.to_hex())));
    assert!(!svg.contains(&ThemeKey::Gold.theme().accent.to_hex()));
}

#[test]
fn invariant_render_is_pure() {
    let mut session = Session::default();
    session.set_font_size(SizeField::Title, 24);
    session.set_profile_text(ProfileField::Whatsapp, "0899-0000-1111");

    assert_eq!(session.card(), session.card());
    assert_eq!(to_svg(&session.card()), to_svg(&session.card()));
}

#[test]
fn scenario_public_url_has_no_editing() {
    let session = Session::new(SessionConfig::resolve(Settings::default(), "?view=public"));
    assert!(session.view().is_public());

    let html = render_page(&session, "?view=public").unwrap();
    assert!(!html.contains("<input"));
    assert!(!html.contains("data-action=\"toggle\""));
    assert!(!html.contains("data-action=\"add-product\""));
}

#[test]
fn scenario_public_gate_overrides_edit_flag() {
    // even with the mode wrongly set to editing
    let gate = ViewGate::with_mode(true, ViewMode::Editing);
    assert!(!gate.editing_visible());
    assert!(!gate.toggle_visible());

    let session = Session::new(SessionConfig::resolve(Settings::default(), "view=public"));
    let page = PageTemplate::build(&session, "");
    assert!(page.editor.is_none());
}

#[test]
fn invariant_other_view_values_are_editable() {
    for query in ["", "?view=edit", "?view=PUBLIC", "?mode=public"] {
        let session = Session::new(SessionConfig::resolve(Settings::default(), query));
        assert!(!session.view().is_public(), "query {:?}", query);
        assert_eq!(session.view().mode(), ViewMode::Editing);
    }
}

#[test]
fn invariant_add_after_loading_max_id() {
    let mut doc = pricelist_core::PriceListDocument::default();
    doc.products[1].id = ProductId(u64::MAX);
    let mut session = Session::from_document(SessionConfig::default(), doc).unwrap();

    let a = session.add_product();
    let b = session.add_product();
    assert_ne!(a, b);
    assert_distinct(&session);
}
