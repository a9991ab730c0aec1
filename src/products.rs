//! Product List - ordered, id-addressed entries

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::ProductDefaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductField {
    Name,
    Plan,
    Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub plan: String,
    /// Free text, shown verbatim after the currency prefix
    pub price: String,
    /// Self-contained `data:` URI
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        plan: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            plan: plan.into(),
            price: price.into(),
            image: None,
        }
    }

    pub fn field(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Plan => &self.plan,
            ProductField::Price => &self.price,
        }
    }
}

/// Source of creation timestamps for new ids
pub trait IdClock {
    fn now_millis(&self) -> u64;
}

pub struct SystemClock;

impl IdClock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductList {
    items: Vec<Product>,
    last_issued: u64,
}

impl ProductList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(items: Vec<Product>) -> Self {
        let last_issued = items.iter().map(|p| p.id.0).max().unwrap_or(0);
        Self { items, last_issued }
    }

    /// The two entries a fresh session starts with
    pub fn seeded() -> Self {
        Self::from_products(vec![
            Product::new(ProductId(1), "Netflix Premium", "1 Bulan", "35.000"),
            Product::new(ProductId(2), "Spotify Premium", "Individual", "20.000"),
        ])
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.items.iter_mut().find(|p| p.id == id)
    }

    /// Creation time, bumped past every id issued so far.
    ///
    /// Once the id space above `last_issued` is exhausted, the smallest id
    /// not held by a current entry is used instead.
    fn next_id(&mut self, clock: &dyn IdClock) -> ProductId {
        let Some(floor) = self.last_issued.checked_add(1) else {
            let id = self.smallest_free_id();
            debug!(%id, "id space exhausted, reusing a free id");
            return id;
        };
        let id = clock.now_millis().max(floor);
        self.last_issued = id;
        ProductId(id)
    }

    fn smallest_free_id(&self) -> ProductId {
        let mut used: Vec<u64> = self.items.iter().map(|p| p.id.0).collect();
        used.sort_unstable();
        used.dedup();
        let mut candidate = 1;
        for id in used {
            if id > candidate {
                break;
            }
            if id == candidate {
                candidate += 1;
            }
        }
        ProductId(candidate)
    }

    /// Append a product with default field values. Returns its id.
    pub fn add(&mut self, defaults: &ProductDefaults, clock: &dyn IdClock) -> ProductId {
        let id = self.next_id(clock);
        self.items.push(Product::new(
            id,
            defaults.name.clone(),
            defaults.plan.clone(),
            defaults.price.clone(),
        ));
        debug!(%id, len = self.items.len(), "product added");
        id
    }

    /// Replace one text field of one product. Unknown ids are ignored.
    pub fn update(&mut self, id: ProductId, field: ProductField, value: impl Into<String>) -> bool {
        let Some(product) = self.get_mut(id) else {
            return false;
        };
        let slot = match field {
            ProductField::Name => &mut product.name,
            ProductField::Plan => &mut product.plan,
            ProductField::Price => &mut product.price,
        };
        *slot = value.into();
        debug!(%id, ?field, "product updated");
        true
    }

    pub fn set_image(&mut self, id: ProductId, image: Option<String>) -> bool {
        let Some(product) = self.get_mut(id) else {
            return false;
        };
        product.image = image;
        debug!(%id, has_image = product.image.is_some(), "product image set");
        true
    }

    /// Remove a product, keeping the order of the rest. Unknown ids are ignored.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        let removed = self.items.len() != before;
        if removed {
            debug!(%id, len = self.items.len(), "product removed");
        }
        removed
    }

    pub fn into_vec(self) -> Vec<Product> {
        self.items
    }
}

impl<'a> IntoIterator for &'a ProductList {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
