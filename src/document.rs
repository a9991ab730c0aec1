//! Price list documents - the serializable snapshot of a session

use serde::{Deserialize, Serialize};

use crate::products::{Product, ProductList};
use crate::profile::StoreProfile;
use crate::themes::ThemeKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListDocument {
    pub store: StoreProfile,
    pub products: Vec<Product>,
    #[serde(default)]
    pub theme: ThemeKey,
}

impl Default for PriceListDocument {
    /// The seed content a new session starts with
    fn default() -> Self {
        Self {
            store: StoreProfile::default(),
            products: ProductList::seeded().into_vec(),
            theme: ThemeKey::default(),
        }
    }
}

impl PriceListDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
