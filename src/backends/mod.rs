//! Media catalog abstractions and concrete catalog implementations.

pub mod fixture;
pub mod web_catalog;

use async_trait::async_trait;

use crate::error::Result;
use crate::media::{MediaItem, MediaKind};

/// Title lookup consumed by the resolution engine.
#[async_trait]
pub trait MediaLookup: Send + Sync {
    /// Returns every candidate the catalog holds for `name`.
    async fn lookup(&self, name: &str) -> Result<Vec<MediaItem>>;
}

/// Interface implemented by concrete media catalogs.
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Searches the catalog for items of `kind` titled like `title`.
    async fn search(&self, kind: MediaKind, title: &str) -> Result<Vec<MediaItem>>;
}

/// Song or album lookup over a catalog.
///
/// Catalog search is loose, so only results whose title equals the requested
/// name (ignoring case and surrounding whitespace) are kept.
pub struct KindLookup<'a, C: ?Sized> {
    catalog: &'a C,
    kind: MediaKind,
}

impl<'a, C: MediaCatalog + ?Sized> KindLookup<'a, C> {
    pub fn new(catalog: &'a C, kind: MediaKind) -> Self {
        Self { catalog, kind }
    }

    pub fn songs(catalog: &'a C) -> Self {
        Self::new(catalog, MediaKind::Song)
    }

    pub fn albums(catalog: &'a C) -> Self {
        Self::new(catalog, MediaKind::Album)
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}

#[async_trait]
impl<C: MediaCatalog + ?Sized> MediaLookup for KindLookup<'_, C> {
    async fn lookup(&self, name: &str) -> Result<Vec<MediaItem>> {
        let mut items = self.catalog.search(self.kind, name).await?;
        items.retain(|item| item.kind == self.kind && title_matches(&item.name, name));
        Ok(items)
    }
}

fn title_matches(candidate: &str, requested: &str) -> bool {
    candidate.trim().to_lowercase() == requested.trim().to_lowercase()
}
