//! Price List Studio Core - Card Editor and Export Engine
//!
//! # Ground Rules
//! 1. The card is a pure function of profile, products and theme
//! 2. Exports capture the rendered card, never the raw state
//! 3. Session configuration is explicit, read once at start
//! 4. Capture and document assembly are swappable capabilities
//! 5. Failures are typed and never end the session

pub mod config;
pub mod document;
pub mod export;
pub mod hashing;
pub mod media;
pub mod page;
pub mod pdf;
pub mod print;
pub mod products;
pub mod profile;
pub mod render;
pub mod session;
pub mod themes;
pub mod validation;
pub mod view;

pub use config::{Features, SessionConfig, Settings};
pub use document::PriceListDocument;
pub use export::{ExportArtifact, ExportError, ExportFormat, Exporter};
pub use hashing::{canonical_json, document_fingerprint, sha256_hex};
pub use media::MediaError;
pub use page::{render_page, share_link};
pub use products::{Product, ProductField, ProductId};
pub use profile::{ProfileField, SizeField, StoreProfile};
pub use render::{render_card, Card};
pub use session::{Session, SessionError};
pub use themes::{Theme, ThemeCatalog, ThemeKey};
pub use validation::{ValidationResult, Validator};
pub use view::{ViewGate, ViewMode};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
