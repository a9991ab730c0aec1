//! Editing Session - single owner of the card state
//!
//! All state is in memory and lives as long as the session. Edits are
//! synchronous; only image reads and exports suspend.

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::document::PriceListDocument;
use crate::export::{ExportArtifact, ExportError, ExportFormat, Exporter};
use crate::media::{encode_data_uri, read_data_uri, MediaError};
use crate::products::{IdClock, Product, ProductField, ProductId, ProductList, SystemClock};
use crate::profile::{ProfileField, SizeField, StoreProfile};
use crate::render::{render_card, Card, CardOptions};
use crate::themes::{Theme, ThemeError, ThemeKey};
use crate::validation::{ValidationResult, Validator};
use crate::view::{ViewGate, ViewMode};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

pub struct Session {
    config: SessionConfig,
    view: ViewGate,
    profile: StoreProfile,
    products: ProductList,
    theme: ThemeKey,
    exporter: Exporter,
    clock: Box<dyn IdClock + Send + Sync>,
}

impl Session {
    /// A session with the seed content and the built-in export capabilities
    pub fn new(config: SessionConfig) -> Self {
        let exporter = Exporter::with_defaults(config.settings.export.clone());
        Self::with_exporter(config, exporter)
    }

    pub fn with_exporter(config: SessionConfig, exporter: Exporter) -> Self {
        let view = ViewGate::new(config.is_public());
        let theme = config.settings.default_theme;
        info!(public = config.is_public(), mode = ?view.mode(), "session started");
        Self {
            config,
            view,
            profile: StoreProfile::default(),
            products: ProductList::seeded(),
            theme,
            exporter,
            clock: Box::new(SystemClock),
        }
    }

    /// Load a document; it must pass validation without errors
    pub fn from_document(config: SessionConfig, document: PriceListDocument) -> Result<Self, SessionError> {
        let report = Validator::new().validate(&document);
        if !report.valid {
            return Err(SessionError::InvalidDocument(report.error_summary()));
        }
        let mut session = Self::new(config);
        session.load(document);
        Ok(session)
    }

    fn load(&mut self, document: PriceListDocument) {
        self.profile = document.store.normalized();
        self.products = ProductList::from_products(document.products);
        self.theme = document.theme;
    }

    pub fn set_clock(&mut self, clock: Box<dyn IdClock + Send + Sync>) {
        self.clock = clock;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    // --- view ---

    pub fn view(&self) -> &ViewGate {
        &self.view
    }

    pub fn toggle_mode(&mut self) -> ViewMode {
        self.view.toggle()
    }

    // --- store profile ---

    pub fn profile(&self) -> &StoreProfile {
        &self.profile
    }

    pub fn set_profile_text(&mut self, field: ProfileField, value: impl Into<String>) {
        self.profile.set_text(field, value);
    }

    /// Returns the clamped size actually stored
    pub fn set_font_size(&mut self, field: SizeField, value: u32) -> u32 {
        self.profile.set_size(field, value)
    }

    // --- products ---

    pub fn products(&self) -> &[Product] {
        self.products.as_slice()
    }

    pub fn add_product(&mut self) -> ProductId {
        self.products.add(&self.config.settings.defaults, self.clock.as_ref())
    }

    pub fn update_product(&mut self, id: ProductId, field: ProductField, value: impl Into<String>) {
        if !self.products.update(id, field, value) {
            debug!(%id, "update ignored, no such product");
        }
    }

    pub fn remove_product(&mut self, id: ProductId) {
        if !self.products.remove(id) {
            debug!(%id, "remove ignored, no such product");
        }
    }

    /// Attach a photo from raw bytes. On error the product is unchanged.
    pub fn attach_image(&mut self, id: ProductId, bytes: &[u8]) -> Result<(), MediaError> {
        let uri = encode_data_uri(bytes).map_err(|e| {
            warn!(%id, error = %e, "image rejected");
            e
        })?;
        self.products.set_image(id, Some(uri));
        Ok(())
    }

    /// Read a photo file, then attach it in one step.
    ///
    /// The previous image stays in place until the read completes.
    pub async fn attach_image_file(&mut self, id: ProductId, path: &Path) -> Result<(), MediaError> {
        let uri = read_data_uri(path).await?;
        self.products.set_image(id, Some(uri));
        Ok(())
    }

    pub fn clear_image(&mut self, id: ProductId) {
        self.products.set_image(id, None);
    }

    // --- theme ---

    pub fn theme(&self) -> &'static Theme {
        self.theme.theme()
    }

    pub fn set_theme(&mut self, key: ThemeKey) {
        self.theme = key;
        debug!(theme = %key, "theme selected");
    }

    /// Select by catalog key; an unknown key is an error
    pub fn set_theme_by_name(&mut self, key: &str) -> Result<(), ThemeError> {
        self.set_theme(key.parse()?);
        Ok(())
    }

    // --- rendering and export ---

    pub fn card_options(&self) -> CardOptions {
        CardOptions::from_settings(&self.config.settings)
    }

    pub fn card(&self) -> Card {
        render_card(&self.profile, self.products.as_slice(), self.theme(), &self.card_options())
    }

    pub fn document(&self) -> PriceListDocument {
        PriceListDocument {
            store: self.profile.clone(),
            products: self.products.as_slice().to_vec(),
            theme: self.theme,
        }
    }

    pub fn validate(&self) -> ValidationResult {
        Validator::new().validate(&self.document())
    }

    pub async fn export(&self, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
        self.exporter.export(&self.card(), format).await
    }

    pub async fn export_png(&self) -> Result<ExportArtifact, ExportError> {
        self.export(ExportFormat::Png).await
    }

    pub async fn export_pdf(&self) -> Result<ExportArtifact, ExportError> {
        self.export(ExportFormat::Pdf).await
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
