//! Application settings read from environment variables.
//!
//! `.env` is loaded by the binary before these are read, so every value can be set
//! either in the process environment or in the `.env` file.

use super::database;
use crate::errors::{Error, Result};

/// Default number of items per page when the request does not give `limit`.
pub const DEFAULT_PAGE_SIZE: u64 = 6;
/// Upper bound for a requested `limit`.
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;
/// Default path of the reference data file.
pub const DEFAULT_REFERENCE_DATA_PATH: &str = "config.toml";

/// Runtime settings for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Connection string passed to `SeaORM`
    pub database_url: String,
    /// Location of the tags/ingredients TOML file
    pub reference_data_path: String,
    /// Page size used when none is requested
    pub page_size: u64,
    /// Largest page size a request may ask for
    pub max_page_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: database::DEFAULT_DATABASE_URL.to_string(),
            reference_data_path: DEFAULT_REFERENCE_DATA_PATH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

fn parse_page_size(name: &str, value: Option<String>, default: u64) -> Result<u64> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(Error::Config {
            message: format!("{name} must be a positive integer, got '{raw}'"),
        }),
    }
}

impl Settings {
    /// Builds settings from `DATABASE_URL`, `REFERENCE_DATA_PATH`, `PAGE_SIZE`
    /// and `MAX_PAGE_SIZE`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_size = parse_page_size("PAGE_SIZE", lookup("PAGE_SIZE"), DEFAULT_PAGE_SIZE)?;
        let max_page_size =
            parse_page_size("MAX_PAGE_SIZE", lookup("MAX_PAGE_SIZE"), DEFAULT_MAX_PAGE_SIZE)?;
        if page_size > max_page_size {
            return Err(Error::Config {
                message: format!("PAGE_SIZE ({page_size}) exceeds MAX_PAGE_SIZE ({max_page_size})"),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| database::DEFAULT_DATABASE_URL.to_string()),
            reference_data_path: lookup("REFERENCE_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_REFERENCE_DATA_PATH.to_string()),
            page_size,
            max_page_size,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_values_are_read() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PAGE_SIZE", "10"),
            ("REFERENCE_DATA_PATH", "data/reference.toml"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.reference_data_path, "data/reference.toml");
        assert_eq!(settings.max_page_size, DEFAULT_MAX_PAGE_SIZE);
    }

    #[test]
    fn test_invalid_page_size_is_rejected() {
        let result = Settings::from_lookup(lookup_from(&[("PAGE_SIZE", "zero")]));
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = Settings::from_lookup(lookup_from(&[("PAGE_SIZE", "0")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_page_size_above_maximum_is_rejected() {
        let result = Settings::from_lookup(lookup_from(&[
            ("PAGE_SIZE", "50"),
            ("MAX_PAGE_SIZE", "20"),
        ]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
