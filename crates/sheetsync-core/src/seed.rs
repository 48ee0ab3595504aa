use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::products::{Catalog, ProductRecord};
use crate::ConfigError;

/// On-disk seed catalog, used as the last-known-good catalog until the first
/// successful sync.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<ProductRecord>,
}

/// Load and validate a seed catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_seed_catalog(&content)
}

fn parse_seed_catalog(content: &str) -> Result<Catalog, ConfigError> {
    let seed: SeedFile = serde_yaml::from_str(content).map_err(ConfigError::SeedFileParse)?;

    validate_seed(&seed)?;

    Ok(Catalog::new(seed.products, None))
}

/// Seed records must satisfy the same acceptance rule as synced rows.
fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for product in &seed.products {
        if product.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "seed product name must be non-empty".to_string(),
            ));
        }

        if product.price <= Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "seed product '{}' has non-positive price {}",
                product.name, product.price
            )));
        }

        if !seen_ids.insert(product.id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate seed product id: '{}'",
                product.id
            )));
        }
    }

    Ok(())
}
