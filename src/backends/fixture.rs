//! In-memory catalog loaded from a JSON fixture, for offline runs.

use std::path::Path;

use async_trait::async_trait;
use log::debug;

use crate::backends::MediaCatalog;
use crate::error::{Error, Result};
use crate::media::{MediaItem, MediaKind};

/// Catalog answering searches from a fixed item list.
///
/// The fixture file is a JSON array of items:
///
/// ```json
/// [{"kind": "song", "name": "Sorry", "artists": [{"name": "Justin Bieber"}],
///   "popularity": 80, "identity": "spotify:track:09CtPGIpYB4BrO8qb1RGsF"}]
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    items: Vec<MediaItem>,
}

impl FixtureCatalog {
    pub fn from_items(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let items: Vec<MediaItem> = serde_json::from_str(content)
            .map_err(|err| Error::config(format!("failed to parse catalog fixture: {err}")))?;
        Ok(Self::from_items(items))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        debug!(
            "Loaded {} catalog fixture items from {}",
            catalog.items.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl MediaCatalog for FixtureCatalog {
    async fn search(&self, kind: MediaKind, title: &str) -> Result<Vec<MediaItem>> {
        let wanted = title.trim().to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| item.kind == kind && item.name.trim().to_lowercase() == wanted)
            .cloned()
            .collect())
    }
}
