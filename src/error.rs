use std::path::PathBuf;

use thiserror::Error;

/// Errors raised around the renderer: loading config and catalogs, resolving
/// sections, and exporting. Rendering itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse catalog {origin}: {source}")]
    ParseCatalog {
        origin: String,
        source: toml::de::Error,
    },

    #[error("Section id {id:?} appears more than once in the catalog")]
    DuplicateSection { id: String },

    #[error("No section {id:?} in the catalog")]
    SectionNotFound { id: String },

    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Export(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
