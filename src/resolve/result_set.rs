//! Accumulated resolution results keyed by quoted name.

use std::collections::{BTreeMap, HashSet};

use crate::media::MediaItem;

/// Union of two candidate lists keeping one item per identity.
/// The first copy encountered wins.
pub fn set_union(left: &[MediaItem], right: &[MediaItem]) -> Vec<MediaItem> {
    let mut seen: HashSet<&str> = HashSet::new();
    left.iter()
        .chain(right)
        .filter(|item| seen.insert(item.identity.as_str()))
        .cloned()
        .collect()
}

/// Resolved candidates per extracted name.
///
/// Every key was extracted from the text at least once; its items never
/// repeat an identity.
#[derive(Debug, Clone, Default, serde::Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    entries: BTreeMap<String, Vec<MediaItem>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `items` into the entry for `name`, creating it if needed.
    pub fn merge(&mut self, name: &str, items: &[MediaItem]) {
        let entry = self.entries.entry(name.to_string()).or_default();
        *entry = set_union(entry, items);
    }

    pub fn get(&self, name: &str) -> Option<&[MediaItem]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MediaItem])> {
        self.entries
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<MediaItem>> {
        self.entries
    }
}
