//! Conversion from [`RawRow`] to [`ProductRecord`].
//!
//! Only two defects reject a row: a blank name and a price that is not a
//! positive amount. Everything else (stock, image, category, id) is repaired
//! with a default. Price and stock parsing live in [`crate::price`], image
//! rewriting in [`crate::image_url`].

use chrono::Utc;
use rust_decimal::Decimal;
use sheetsync_core::{ProductId, ProductRecord};

use crate::csv::RawRow;
use crate::error::RowRejection;
use crate::image_url::{ImageHosts, ImageUrlRewriter};
use crate::price::{parse_price, parse_stock};

/// Category applied when the sheet leaves the cell blank.
pub const DEFAULT_CATEGORY: &str = "PC MONTADO";

/// Header names of the source sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub category: String,
    pub stock: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: "ID DO PRODUTO".to_owned(),
            name: "NOME DO PRODUTO".to_owned(),
            description: "DESCRIÇÃO".to_owned(),
            price: "VALOR".to_owned(),
            image_url: "FOTO".to_owned(),
            category: "CATEGORIA".to_owned(),
            stock: "ESTOQUE".to_owned(),
        }
    }
}

pub struct FieldNormalizer {
    columns: ColumnMap,
    images: ImageUrlRewriter,
}

impl FieldNormalizer {
    #[must_use]
    pub fn new(columns: ColumnMap, hosts: &ImageHosts) -> Self {
        Self {
            columns,
            images: ImageUrlRewriter::new(hosts),
        }
    }

    /// Normalizes one row.
    ///
    /// # Errors
    ///
    /// - [`RowRejection::MissingName`] when the name cell is absent or blank.
    /// - [`RowRejection::InvalidPrice`] when the price cannot be parsed or is `<= 0`.
    pub fn normalize(&self, row: &RawRow) -> Result<ProductRecord, RowRejection> {
        let cell = |header: &str| row.get(header).map(str::trim);

        let name = cell(self.columns.name.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(RowRejection::MissingName)?
            .to_owned();

        let raw_price = cell(self.columns.price.as_str()).unwrap_or_default();
        let price = parse_price(raw_price)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| RowRejection::InvalidPrice {
                raw: raw_price.to_owned(),
            })?;

        let id = cell(self.columns.id.as_str())
            .filter(|s| !s.is_empty())
            .map_or_else(ProductId::synthetic, ProductId::from_cell);

        let category = cell(self.columns.category.as_str())
            .filter(|s| !s.is_empty())
            .map_or_else(|| DEFAULT_CATEGORY.to_owned(), str::to_uppercase);

        let now = Utc::now();

        Ok(ProductRecord {
            id,
            name,
            description: cell(self.columns.description.as_str())
                .unwrap_or_default()
                .to_owned(),
            price,
            image_url: self.images.rewrite(cell(self.columns.image_url.as_str())),
            category,
            stock: parse_stock(cell(self.columns.stock.as_str())),
            created_at: now,
            updated_at: now,
        })
    }

    /// Normalizes every row, keeping source order and dropping rejected rows.
    #[must_use]
    pub fn normalize_all(&self, rows: &[RawRow]) -> Vec<ProductRecord> {
        let products: Vec<ProductRecord> = rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| match self.normalize(row) {
                Ok(product) => Some(product),
                Err(reason) => {
                    tracing::debug!(row = idx + 1, %reason, "skipping row");
                    None
                }
            })
            .collect();

        if products.len() < rows.len() {
            tracing::info!(
                accepted = products.len(),
                rejected = rows.len() - products.len(),
                "normalized sheet rows"
            );
        }
        products
    }
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(ColumnMap::default(), &ImageHosts::default())
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
