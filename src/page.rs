//! Editor page: nav bar, optional editing panel, card preview

use askama::Template;
use url::Url;

use crate::profile::{SizeField, FONT_SIZE_RANGE};
use crate::render::to_svg;
use crate::session::Session;
use crate::themes::ThemeCatalog;

pub struct ThemeOption {
    pub key: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub struct SizeInput {
    pub key: String,
    pub label: &'static str,
    pub value: u32,
    pub min: u32,
    pub max: u32,
}

pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub plan: String,
    pub price: String,
    pub has_image: bool,
}

pub struct EditorPanel {
    pub name: String,
    pub tagline: String,
    pub instagram: String,
    pub whatsapp: String,
    pub themes: Vec<ThemeOption>,
    pub sizes: Vec<SizeInput>,
    pub products: Vec<ProductRow>,
    pub show_photos: bool,
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub show_toggle: bool,
    pub toggle_label: &'static str,
    pub share_href: String,
    pub editor: Option<EditorPanel>,
    pub card_svg: String,
    pub busy: bool,
}

fn editor_panel(session: &Session) -> EditorPanel {
    let features = session.config().settings.features;
    let profile = session.profile();
    let active = session.theme().key;

    let themes = if features.theming {
        ThemeCatalog::list()
            .iter()
            .map(|t| ThemeOption { key: t.key.as_str(), label: t.name, selected: t.key == active })
            .collect()
    } else {
        Vec::new()
    };
    let sizes = if features.font_controls {
        SizeField::ALL
            .into_iter()
            .map(|f| SizeInput {
                key: f.label().to_lowercase(),
                label: f.label(),
                value: profile.size(f),
                min: *FONT_SIZE_RANGE.start(),
                max: *FONT_SIZE_RANGE.end(),
            })
            .collect()
    } else {
        Vec::new()
    };

    EditorPanel {
        name: profile.name.clone(),
        tagline: profile.tagline.clone(),
        instagram: profile.instagram.clone(),
        whatsapp: profile.whatsapp.clone(),
        themes,
        sizes,
        products: session
            .products()
            .iter()
            .map(|p| ProductRow {
                id: p.id.to_string(),
                name: p.name.clone(),
                plan: p.plan.clone(),
                price: p.price.clone(),
                has_image: p.image.is_some(),
            })
            .collect(),
        show_photos: features.photos,
    }
}

impl PageTemplate {
    pub fn build(session: &Session, share_href: &str) -> Self {
        let view = session.view();
        Self {
            title: session.profile().name.clone(),
            show_toggle: view.toggle_visible(),
            toggle_label: view.toggle_label(),
            share_href: share_href.to_string(),
            editor: view.editing_visible().then(|| editor_panel(session)),
            card_svg: to_svg(&session.card()),
            busy: session.exporter().is_busy(),
        }
    }
}

/// Render the full editor page as HTML
pub fn render_page(session: &Session, share_href: &str) -> Result<String, askama::Error> {
    PageTemplate::build(session, share_href).render()
}

/// The read-only link for the page at `current`
pub fn share_link(current: &Url) -> Url {
    let mut url = current.clone();
    url.set_query(Some("view=public"));
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SessionConfig, Settings};
    use crate::view::{ViewGate, ViewMode};

    #[test]
    fn test_share_link_replaces_query() {
        let url = Url::parse("https://shop.example/list?lang=id#top").unwrap();
        assert_eq!(share_link(&url).as_str(), "https://shop.example/list?view=public");
    }

    #[test]
    fn test_editor_page_has_inputs() {
        let session = Session::default();
        let html = render_page(&session, "?view=public").unwrap();
        assert!(html.contains("<input"));
        assert!(html.contains("Preview"));
        assert!(html.contains(r#"value="LUXE DIGITAL STORE""#));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_public_page_has_no_editing() {
        let session = Session::new(SessionConfig::resolve(Settings::default(), "view=public"));
        let page = PageTemplate::build(&session, "?view=public");
        assert!(page.editor.is_none());
        assert!(!page.show_toggle);

        let html = page.render().unwrap();
        assert!(!html.contains("<input"));
        assert!(!html.contains("data-action=\"toggle\""));
        assert!(html.contains("LUXE DIGITAL STORE"));
    }

    #[test]
    fn test_preview_mode_hides_panel() {
        let mut session = Session::default();
        session.toggle_mode();
        let page = PageTemplate::build(&session, "?view=public");
        assert!(page.editor.is_none());
        assert!(page.show_toggle);
        assert_eq!(page.toggle_label, "Edit");
    }

    #[test]
    fn test_gate_is_what_decides() {
        assert!(!ViewGate::with_mode(true, ViewMode::Editing).editing_visible());
    }

    #[test]
    fn test_feature_switches() {
        let mut settings = Settings::default();
        settings.features.theming = false;
        settings.features.font_controls = false;
        let session = Session::new(SessionConfig::editing(settings));
        let page = PageTemplate::build(&session, "");
        let editor = page.editor.unwrap();
        assert!(editor.themes.is_empty());
        assert!(editor.sizes.is_empty());
        assert_eq!(editor.products.len(), 2);
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut session = Session::default();
        session.set_profile_text(crate::profile::ProfileField::Tagline, "<script>x</script>");
        let html = render_page(&session, "").unwrap();
        assert!(!html.contains("<script>x</script>"));
    }
}
