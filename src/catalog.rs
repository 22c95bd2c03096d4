//! Section catalog: resolves section identifiers to document text.
//!
//! A catalog is an ordered outline of groups, each holding sections. A
//! section may be listed before it has any content; asking for the text of
//! such a section, like asking for an unknown id, is a
//! [`Error::SectionNotFound`], never an empty document.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::block::Document;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Catalog {
    #[serde(default)]
    groups: Vec<Group>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl Section {
    /// Whether the section has content to render.
    pub fn is_written(&self) -> bool {
        self.content.is_some()
    }
}

impl Catalog {
    /// Parse a catalog from TOML text. `origin` names the source in errors.
    pub fn from_toml_str(toml_text: &str, origin: &str) -> Result<Self> {
        let catalog: Catalog =
            toml::from_str(toml_text).map_err(|source| Error::ParseCatalog {
                origin: origin.to_string(),
                source,
            })?;
        catalog.check_unique_ids()?;
        debug!(
            "loaded catalog {origin}: {} groups, {} sections",
            catalog.groups.len(),
            catalog.sections().count()
        );
        Ok(catalog)
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for section in self.sections() {
            if !seen.insert(section.id.as_str()) {
                return Err(Error::DuplicateSection {
                    id: section.id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All sections in outline order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.groups.iter().flat_map(|group| group.sections.iter())
    }

    /// Look up a section by id, written or not.
    pub fn section(&self, id: &str) -> Result<&Section> {
        self.sections()
            .find(|section| section.id == id)
            .ok_or_else(|| Error::SectionNotFound { id: id.to_string() })
    }

    /// Text of a section. Unwritten sections are not found.
    pub fn content(&self, id: &str) -> Result<&str> {
        self.section(id)?
            .content
            .as_deref()
            .ok_or_else(|| Error::SectionNotFound { id: id.to_string() })
    }

    /// Render a section's text into a document.
    pub fn render_section(&self, id: &str) -> Result<Document> {
        self.content(id).map(crate::render)
    }

    /// The sections before and after `id` in outline order.
    pub fn neighbors(&self, id: &str) -> Result<(Option<&Section>, Option<&Section>)> {
        let sections: Vec<&Section> = self.sections().collect();
        let position = sections
            .iter()
            .position(|section| section.id == id)
            .ok_or_else(|| Error::SectionNotFound { id: id.to_string() })?;

        let previous = position.checked_sub(1).map(|i| sections[i]);
        let next = sections.get(position + 1).copied();
        Ok((previous, next))
    }

    /// Sections whose title or content contains `query`, ignoring case.
    ///
    /// An empty query matches every section.
    pub fn search(&self, query: &str) -> Vec<&Section> {
        let needle = query.trim().to_lowercase();
        self.sections()
            .filter(|section| {
                needle.is_empty()
                    || section.title.to_lowercase().contains(&needle)
                    || section
                        .content
                        .as_deref()
                        .is_some_and(|content| content.to_lowercase().contains(&needle))
            })
            .collect()
    }
}
