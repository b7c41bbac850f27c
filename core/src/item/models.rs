use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A recharge/payment option as stored in the document.
///
/// The wire names (`click`, `images`) are the ones already present in the
/// stored data and must not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "click", default)]
    pub target_url: String,

    #[serde(rename = "images", default)]
    pub image_url: String,
}

pub type Collection = Vec<Item>;

impl Item {
    pub fn new(
        name: impl Into<String>,
        target_url: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_url: target_url.into(),
            image_url: image_url.into(),
        }
    }

    /// `name` and `target_url` must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.target_url.trim().is_empty() {
            missing.push("targetUrl");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serializes_with_stored_field_names() {
        let item = Item::new("PayFast", "https://payfast.example", "https://cdn/pf.png");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"name": "PayFast", "click": "https://payfast.example", "images": "https://cdn/pf.png"})
        );
    }

    #[test]
    fn missing_image_decodes_as_empty() {
        let item: Item =
            serde_json::from_value(json!({"name": "A", "click": "https://a.example"})).unwrap();
        assert_eq!(item.image_url, "");
    }

    #[test]
    fn validate_accepts_empty_image() {
        assert!(Item::new("A", "https://a.example", "").validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        let err = Item::new("  ", "", "https://cdn/x.png")
            .validate()
            .unwrap_err();
        match err {
            StoreError::Validation { missing } => assert_eq!(missing, vec!["name", "targetUrl"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
