use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a catalog product.
///
/// Canonical non-negative integers are [`ProductId::Number`] whether they come
/// from a seed file or a sheet cell, so the same product compares equal in
/// both. Rows without an id get a [`ProductId::Synthetic`] value minted at
/// normalization time, which is **not** stable across syncs.
///
/// Variant order matters for the untagged deserializer: a UUID-shaped string
/// reads back as `Synthetic`, anything else as `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(u64),
    Synthetic(Uuid),
    Text(String),
}

impl ProductId {
    #[must_use]
    pub fn synthetic() -> Self {
        Self::Synthetic(Uuid::new_v4())
    }

    /// Id for a sheet cell or user input. `"17"` is `Number(17)`; `"017"`
    /// and `"PC-17"` stay text so nothing is lost when displayed again.
    #[must_use]
    pub fn from_cell(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u64>() {
            Ok(n) if n.to_string() == raw => Self::Number(n),
            _ => Self::Text(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Text(s) => write!(f, "{s}"),
            ProductId::Synthetic(u) => write!(f, "{u}"),
        }
    }
}

fn default_stock() -> u32 {
    1
}

/// A product row from the spreadsheet after repair and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Always `> 0` for records that made it into a [`Catalog`].
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Never empty; missing or unusable source URLs become placeholder images.
    pub image_url: String,
    /// Upper-cased category label.
    pub category: String,
    /// Zero and unparsable stock both read as `1` ("unknown"), not "sold out".
    #[serde(default = "default_stock")]
    pub stock: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// The ordered product list currently considered authoritative.
///
/// Replaced wholesale on every successful sync, never merged. Order matches
/// the row order of the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<ProductRecord>,
    /// When the payload behind this catalog was fetched. `None` for seed or
    /// empty catalogs.
    pub synced_at: Option<DateTime<Utc>>,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<ProductRecord>, synced_at: Option<DateTime<Utc>>) -> Self {
        Self {
            products,
            synced_at,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRecord> {
        self.products.iter()
    }

    /// `(name, price)` pairs in catalog order, the shape consumed by the
    /// outbound contact-link builder.
    pub fn price_list(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.products.iter().map(|p| (p.name.as_str(), p.price))
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.products.iter().find(|p| &p.id == id)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ProductRecord;
    type IntoIter = std::slice::Iter<'a, ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn record(id: ProductId, name: &str, price: &str) -> ProductRecord {
        let now = Utc::now();
        ProductRecord {
            id,
            name: name.to_owned(),
            description: String::new(),
            price: Decimal::from_str(price).unwrap(),
            image_url: "https://i.imgur.com/abc.jpg".to_owned(),
            category: "PC MONTADO".to_owned(),
            stock: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn product_id_display() {
        assert_eq!(ProductId::Number(7).to_string(), "7");
        assert_eq!(ProductId::Text("SKU-9".to_owned()).to_string(), "SKU-9");
    }

    #[test]
    fn synthetic_ids_are_unique() {
        let a = ProductId::synthetic();
        let b = ProductId::synthetic();
        assert!(a.is_synthetic());
        assert_ne!(a, b);
    }

    #[test]
    fn product_id_deserializes_numbers_and_strings() {
        let n: ProductId = serde_json::from_str("12").unwrap();
        let s: ProductId = serde_json::from_str("\"A-12\"").unwrap();
        assert_eq!(n, ProductId::Number(12));
        assert_eq!(s, ProductId::Text("A-12".to_owned()));
    }

    #[test]
    fn cell_ids_match_seed_ids() {
        let seeded: ProductId = serde_yaml::from_str("1").unwrap();
        assert_eq!(ProductId::from_cell(" 1 "), seeded);
        assert_eq!(ProductId::from_cell("017"), ProductId::Text("017".to_owned()));
        assert_eq!(ProductId::from_cell("PC-17"), ProductId::Text("PC-17".to_owned()));
        assert_eq!(ProductId::from_cell("-3"), ProductId::Text("-3".to_owned()));
    }

    #[test]
    fn synthetic_id_survives_serde_round_trip() {
        let id = ProductId::synthetic();
        let json = serde_json::to_string(&id).unwrap();
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(back.is_synthetic());
    }

    #[test]
    fn find_matches_numeric_sheet_id() {
        let catalog = Catalog::new(
            vec![record(ProductId::from_cell("1"), "PC 1", "1000")],
            None,
        );
        assert!(catalog.find(&ProductId::Number(1)).is_some());
    }

    #[test]
    fn price_serializes_as_string() {
        let r = record(ProductId::Number(1), "PC 1", "1234.56");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["price"], "1234.56");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn price_list_preserves_order() {
        let catalog = Catalog::new(
            vec![
                record(ProductId::Number(1), "PC 1", "1000"),
                record(ProductId::Number(2), "PC 2", "1100.50"),
            ],
            None,
        );
        let pairs: Vec<_> = catalog.price_list().collect();
        assert_eq!(pairs[0], ("PC 1", Decimal::from(1000)));
        assert_eq!(pairs[1].0, "PC 2");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn find_by_id() {
        let catalog = Catalog::new(
            vec![record(ProductId::Text("X".to_owned()), "PC X", "10")],
            None,
        );
        assert!(catalog.find(&ProductId::Text("X".to_owned())).is_some());
        assert!(catalog.find(&ProductId::Number(1)).is_none());
    }

    #[test]
    fn default_catalog_is_empty() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.synced_at.is_none());
    }
}
