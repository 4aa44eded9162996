//! Candidate media items returned by catalog lookups.

use std::hash::{Hash, Hasher};

/// Catalog entity family a candidate belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    Song,
    Album,
}

impl MediaKind {
    /// Catalog search type keyword for this kind.
    pub fn search_type(self) -> &'static str {
        match self {
            Self::Song => "track",
            Self::Album => "album",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Album => "album",
        }
    }
}

/// Artist credited on a media item.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Contributor {
    pub name: String,
}

impl Contributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Song or album candidate for a quoted title.
///
/// Equality and hashing only look at `identity`; two copies of the same
/// catalog entry are interchangeable even if other fields differ.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct MediaItem {
    #[serde(default)]
    pub kind: MediaKind,
    /// Display title.
    pub name: String,
    /// Credited artists, in catalog order.
    pub artists: Vec<Contributor>,
    /// Catalog popularity score; absent until the catalog provides it.
    #[serde(default)]
    pub popularity: Option<u32>,
    /// Stable catalog URI.
    pub identity: String,
}

impl MediaItem {
    pub fn new(
        kind: MediaKind,
        name: impl Into<String>,
        artists: &[&str],
        popularity: Option<u32>,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            artists: artists.iter().map(|artist| Contributor::new(*artist)).collect(),
            popularity,
            identity: identity.into(),
        }
    }

    /// Contributor names joined for display.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for MediaItem {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for MediaItem {}

impl Hash for MediaItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}
