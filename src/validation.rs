//! Document Validation - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Only errors block loading a document; warnings and info are reported.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::document::PriceListDocument;
use crate::media::decode_data_uri;
use crate::profile::{SizeField, FONT_SIZE_RANGE};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// Error messages joined for display
    pub fn error_summary(&self) -> String {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, document: &PriceListDocument) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct UniqueIdsRule;

impl ValidationRule for UniqueIdsRule {
    fn name(&self) -> &'static str { "unique_ids" }

    fn validate(&self, document: &PriceListDocument) -> Vec<ValidationViolation> {
        let mut seen = HashSet::new();
        document
            .products
            .iter()
            .filter(|p| !seen.insert(p.id))
            .map(|p| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("Duplicate product id {}", p.id),
                expected: Some("unique ids".to_string()),
                actual: Some(p.id.to_string()),
                remediation: vec!["Give every product its own id".to_string()],
            })
            .collect()
    }
}

pub struct ImageDataRule;

impl ValidationRule for ImageDataRule {
    fn name(&self) -> &'static str { "image_data" }

    fn validate(&self, document: &PriceListDocument) -> Vec<ValidationViolation> {
        document
            .products
            .iter()
            .filter_map(|p| {
                let uri = p.image.as_deref()?;
                let err = decode_data_uri(uri).err()?;
                Some(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!("Product {} has an unusable image", p.id),
                    expected: Some("base64 image data URI".to_string()),
                    actual: Some(err.to_string()),
                    remediation: vec!["Re-attach the photo or clear it".to_string()],
                })
            })
            .collect()
    }
}

pub struct FontSizeRule;

impl ValidationRule for FontSizeRule {
    fn name(&self) -> &'static str { "font_size" }

    fn validate(&self, document: &PriceListDocument) -> Vec<ValidationViolation> {
        SizeField::ALL
            .into_iter()
            .filter(|f| !FONT_SIZE_RANGE.contains(&document.store.size(*f)))
            .map(|f| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("{} size out of range, will be clamped", f.label()),
                expected: Some(format!(
                    "{}..={}",
                    FONT_SIZE_RANGE.start(),
                    FONT_SIZE_RANGE.end()
                )),
                actual: Some(document.store.size(f).to_string()),
                remediation: vec!["Pick a size inside the range".to_string()],
            })
            .collect()
    }
}

pub struct BlankNameRule;

impl ValidationRule for BlankNameRule {
    fn name(&self) -> &'static str { "blank_name" }

    fn validate(&self, document: &PriceListDocument) -> Vec<ValidationViolation> {
        document
            .products
            .iter()
            .filter(|p| p.name.trim().is_empty())
            .map(|p| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Info,
                message: format!("Product {} has no name", p.id),
                expected: None,
                actual: None,
                remediation: vec![],
            })
            .collect()
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(UniqueIdsRule),
                Box::new(ImageDataRule),
                Box::new(FontSizeRule),
                Box::new(BlankNameRule),
            ],
        }
    }

    pub fn validate(&self, document: &PriceListDocument) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(document))
            .collect();
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::{Product, ProductId};

    #[test]
    fn test_seed_document_is_clean() {
        let result = Validator::new().validate(&PriceListDocument::default());
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_duplicate_ids_block() {
        let mut doc = PriceListDocument::default();
        doc.products.push(Product::new(ProductId(1), "Copy", "Plan", "0"));
        let result = Validator::new().validate(&doc);
        assert!(!result.valid);
        assert!(result.error_summary().contains("unique_ids"));
    }

    #[test]
    fn test_bad_image_blocks() {
        let mut doc = PriceListDocument::default();
        doc.products[0].image = Some("data:image/png;base64,AAAA".to_string());
        let result = Validator::new().validate(&doc);
        assert!(!result.valid);
        assert_eq!(result.violations[0].rule, "image_data");
    }

    #[test]
    fn test_size_and_name_do_not_block() {
        let mut doc = PriceListDocument::default();
        doc.store.title_size = 200;
        doc.products[1].name = "  ".to_string();
        let result = Validator::new().validate(&doc);
        assert!(result.valid);
        let severities: Vec<_> = result.violations.iter().map(|v| v.severity.clone()).collect();
        assert_eq!(severities, vec![ViolationSeverity::Warning, ViolationSeverity::Info]);
    }
}
