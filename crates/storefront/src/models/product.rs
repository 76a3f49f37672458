//! Product domain types.

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tcg_store_core::{Price, ProductId};

/// A catalog product.
///
/// Locally added products have no ID; products fetched from the main service
/// carry the server-assigned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned ID, when the product came from the main service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Image reference (content URI or server path).
    #[serde(rename = "imageUri")]
    pub image: String,
}

impl Product {
    /// The identity used to merge cart lines and remove catalog entries.
    #[must_use]
    pub fn key(&self) -> ProductKey {
        self.id
            .map_or_else(|| ProductKey::Name(self.name.clone()), ProductKey::Id)
    }
}

/// Identity of a product.
///
/// The server ID when known, otherwise the product name. Two local products
/// with the same name are the same product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductKey {
    Id(ProductId),
    Name(String),
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Parses the `Display` form: `#12` is an ID, anything else a name.
impl FromStr for ProductKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.strip_prefix('#')
            .and_then(|id| id.parse::<i64>().ok())
            .map_or_else(|| Self::Name(s.to_string()), |id| Self::Id(ProductId::new(id))))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: Option<i64>, name: &str) -> Product {
        Product {
            id: id.map(ProductId::new),
            name: name.to_string(),
            description: String::new(),
            price: Price::new(1_000),
            image: String::new(),
        }
    }

    #[test]
    fn test_key_prefers_server_id() {
        assert_eq!(product(Some(3), "Booster").key(), ProductKey::Id(ProductId::new(3)));
        assert_eq!(
            product(None, "Booster").key(),
            ProductKey::Name("Booster".to_string())
        );
    }

    #[test]
    fn test_same_name_different_ids_are_distinct() {
        assert_ne!(product(Some(1), "Booster").key(), product(Some(2), "Booster").key());
    }

    #[test]
    fn test_key_parses_display_form() {
        assert_eq!("#7".parse::<ProductKey>().unwrap(), ProductKey::Id(ProductId::new(7)));
        assert_eq!(
            "Booster".parse::<ProductKey>().unwrap(),
            ProductKey::Name("Booster".to_string())
        );
        assert_eq!(
            "#promo".parse::<ProductKey>().unwrap(),
            ProductKey::Name("#promo".to_string())
        );
    }

    #[test]
    fn test_local_product_json_has_no_id() {
        let json = serde_json::to_value(product(None, "Booster")).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["imageUri"], "");
        assert_eq!(json["price"], 1_000);
    }
}
