//! Reference data loading from config.toml
//!
//! Tags and ingredients are read-only for API users. They are declared in a TOML
//! file and seeded into the database on startup; rows that already exist are left
//! untouched.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire reference data file
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceData {
    /// Tags to seed
    #[serde(default)]
    pub tags: Vec<TagConfig>,
    /// Ingredients to seed
    #[serde(default)]
    pub ingredients: Vec<IngredientConfig>,
}

/// Configuration for a single tag
#[derive(Debug, Deserialize, Clone)]
pub struct TagConfig {
    /// Display name (e.g., "Breakfast")
    pub name: String,
    /// Hex color, `#RRGGBB`
    pub color: String,
    /// Unique slug used in filters
    pub slug: String,
}

/// Configuration for a single ingredient
#[derive(Debug, Deserialize, Clone)]
pub struct IngredientConfig {
    /// Product name
    pub name: String,
    /// Unit amounts are given in
    pub measurement_unit: String,
}

/// Parses reference data from TOML text.
pub fn parse_reference_data(contents: &str) -> Result<ReferenceData> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse reference data: {e}"),
    })
}

/// Loads reference data from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_reference_data<P: AsRef<Path>>(path: P) -> Result<ReferenceData> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading reference data from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read reference data file {}: {e}", path_ref.display()),
    })?;
    parse_reference_data(&contents)
}
