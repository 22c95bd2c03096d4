use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::block::Glyph;
use crate::error::{Error, Result};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Presentation settings shared by the HTML and Typst renderers.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub links: LinksConfig,
    pub page: PageConfig,
    pub symbols: SymbolsConfig,
    pub code: CodeConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
    pub underline: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#7c3aed".to_string(),
            underline: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

/// Colors for the glyphs lifted out of running text.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SymbolsConfig {
    pub arrow: String,
    pub check: String,
    pub cross: String,
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            arrow: "#9333ea".to_string(),
            check: "#16a34a".to_string(),
            cross: "#dc2626".to_string(),
        }
    }
}

impl SymbolsConfig {
    pub fn color_for(&self, glyph: Glyph) -> &str {
        match glyph {
            Glyph::Arrow => &self.arrow,
            Glyph::Check => &self.check,
            Glyph::Cross => &self.cross,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodeConfig {
    pub show_language: bool,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            show_language: true,
        }
    }
}

impl Config {
    /// The configuration bundled into the binary.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load config from a TOML file, or return the compiled default if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::compiled_default())
        }
    }
}
