/// Database connection and schema creation
pub mod database;

/// Tag and ingredient reference data loading from config.toml
pub mod reference_data;

/// Runtime settings from environment variables
pub mod settings;

pub use settings::Settings;
