//! Media mention resolution pipeline.
//!
//! Text is split into paragraphs; every quoted title in a paragraph is looked
//! up, narrowed by the artists the paragraph (or, failing that, the whole
//! document) mentions, collapsed to the most popular item per artist list and
//! merged into a [`ResultSet`].

pub mod artist_filter;
pub mod mention_matcher;
pub mod popularity;
pub mod result_set;
pub mod text_spans;

use std::path::Path;

use log::{debug, info};

use crate::backends::{KindLookup, MediaCatalog, MediaLookup};
use crate::error::Result;
use crate::input::read_bounded;
use crate::media::MediaKind;

use self::artist_filter::filter_if_any_artists_mentioned_greedy;
use self::popularity::reduce_by_popularity_per_artist;
pub use self::result_set::ResultSet;
use self::result_set::set_union;
use self::text_spans::{extract_candidate_names, split_paragraphs};

/// Resolves every quoted title in `text` through `lookup`.
///
/// Lookups run one at a time in text order. The first lookup or popularity
/// error aborts the call and nothing resolved so far is returned.
pub async fn find_media_items<L>(text: &str, lookup: &L) -> Result<ResultSet>
where
    L: MediaLookup + ?Sized,
{
    let mut results = ResultSet::new();
    let paragraphs = split_paragraphs(text);
    debug!("Resolving media mentions in {} paragraphs", paragraphs.len());

    for paragraph in paragraphs {
        for name in extract_candidate_names(paragraph) {
            let candidates = set_union(&lookup.lookup(&name).await?, &[]);
            debug!("Lookup '{}' returned {} candidates", name, candidates.len());
            let filtered = filter_if_any_artists_mentioned_greedy(&candidates, paragraph, text);
            let reduced = reduce_by_popularity_per_artist(&filtered)?;
            results.merge(&name, &reduced);
        }
    }

    info!("Resolved {} quoted names", results.len());
    Ok(results)
}

/// Resolves quoted titles of `kind` in `text` against `catalog`.
pub async fn find_in_text<C>(text: &str, catalog: &C, kind: MediaKind) -> Result<ResultSet>
where
    C: MediaCatalog + ?Sized,
{
    find_media_items(text, &KindLookup::new(catalog, kind)).await
}

/// Reads `path` within `max_chars` and resolves quoted titles of `kind`.
pub async fn find_in_file<C>(
    path: &Path,
    catalog: &C,
    kind: MediaKind,
    max_chars: usize,
) -> Result<ResultSet>
where
    C: MediaCatalog + ?Sized,
{
    let text = read_bounded(path, max_chars)?;
    find_in_text(&text, catalog, kind).await
}

/// Song mentions in the file at `path`.
pub async fn find_songs<C>(path: &Path, catalog: &C, max_chars: usize) -> Result<ResultSet>
where
    C: MediaCatalog + ?Sized,
{
    find_in_file(path, catalog, MediaKind::Song, max_chars).await
}

/// Album mentions in the file at `path`.
pub async fn find_albums<C>(path: &Path, catalog: &C, max_chars: usize) -> Result<ResultSet>
where
    C: MediaCatalog + ?Sized,
{
    find_in_file(path, catalog, MediaKind::Album, max_chars).await
}

#[cfg(test)]
mod tests {
    use super::find_media_items;
    use crate::backends::MediaLookup;
    use crate::error::{Error, Result};
    use crate::media::{MediaItem, MediaKind};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct ScriptedLookup {
        answers: HashMap<String, Vec<MediaItem>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedLookup {
        fn new(answers: &[(&str, Vec<MediaItem>)]) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(name, items)| (name.to_string(), items.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl MediaLookup for ScriptedLookup {
        async fn lookup(&self, name: &str) -> Result<Vec<MediaItem>> {
            self.calls.lock().expect("calls lock").push(name.to_string());
            match self.answers.get(name) {
                Some(items) => Ok(items.clone()),
                None if name == "Broken" => Err(Error::lookup("catalog unavailable")),
                None => Ok(Vec::new()),
            }
        }
    }

    fn song(artist: &str, popularity: Option<u32>, identity: &str) -> MediaItem {
        MediaItem::new(MediaKind::Song, "Sorry", &[artist], popularity, identity)
    }

    fn sorry_candidates() -> Vec<MediaItem> {
        vec![
            song("Justin Bieber", Some(80), "uri:bieber"),
            song("Nothing But Thieves", Some(50), "uri:thieves"),
        ]
    }

    #[tokio::test]
    async fn test_paragraph_artist_disambiguates() {
        let lookup = ScriptedLookup::new(&[("Sorry", sorry_candidates())]);
        let results = find_media_items("\"Sorry\" by Justin Bieber.", &lookup)
            .await
            .expect("resolution succeeds");
        let items = results.get("Sorry").expect("Sorry resolved");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identity, "uri:bieber");
    }

    #[tokio::test]
    async fn test_repeated_mention_is_looked_up_twice_but_stored_once() {
        let lookup = ScriptedLookup::new(&[(
            "Sorry",
            vec![song("Justin Bieber", Some(80), "uri:bieber")],
        )]);
        let results = find_media_items(
            "\"Sorry\" by Justin Bieber... as I said, \"Sorry\"...",
            &lookup,
        )
        .await
        .expect("resolution succeeds");
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("Sorry").map(<[MediaItem]>::len), Some(1));
        assert_eq!(lookup.calls(), vec!["Sorry", "Sorry"]);
    }

    #[tokio::test]
    async fn test_whole_document_fallback_and_per_paragraph_merge() {
        let lookup = ScriptedLookup::new(&[("Sorry", sorry_candidates())]);
        let text = "Nothing But Thieves opened the night.\n\nThen came \"Sorry\".\n\"Sorry\" by Justin Bieber closed it.";
        let results = find_media_items(text, &lookup)
            .await
            .expect("resolution succeeds");
        let mut identities: Vec<&str> = results
            .get("Sorry")
            .expect("Sorry resolved")
            .iter()
            .map(|item| item.identity.as_str())
            .collect();
        identities.sort_unstable();
        assert_eq!(identities, vec!["uri:bieber", "uri:thieves"]);
    }

    #[tokio::test]
    async fn test_unknown_title_still_becomes_a_key() {
        let lookup = ScriptedLookup::new(&[]);
        let results = find_media_items("I like \"Nothing Known\".", &lookup)
            .await
            .expect("resolution succeeds");
        assert!(results.get("Nothing Known").is_some_and(<[MediaItem]>::is_empty));
    }

    #[tokio::test]
    async fn test_lookup_failure_aborts_resolution() {
        let lookup = ScriptedLookup::new(&[("Sorry", sorry_candidates())]);
        let error = find_media_items("\"Broken\" then \"Sorry\"", &lookup)
            .await
            .expect_err("lookup failure must propagate");
        assert!(matches!(error, Error::Lookup(_)));
        assert_eq!(lookup.calls(), vec!["Broken"]);
    }

    #[tokio::test]
    async fn test_missing_popularity_aborts_resolution() {
        let lookup = ScriptedLookup::new(&[(
            "American Pie",
            vec![
                MediaItem::new(MediaKind::Song, "American Pie", &["Don McLean"], Some(3), "uri:1"),
                MediaItem::new(MediaKind::Song, "American Pie", &["Don McLean"], None, "uri:2"),
            ],
        )]);
        let error = find_media_items("\"American Pie\" by Don McLean", &lookup)
            .await
            .expect_err("missing popularity must propagate");
        assert!(matches!(error, Error::MissingPopularity { .. }));
    }

    #[tokio::test]
    async fn test_repeated_catalog_entry_counts_as_one_candidate() {
        let purpose =
            MediaItem::new(MediaKind::Album, "Purpose", &["Justin Bieber"], None, "uri:p");
        let lookup = ScriptedLookup::new(&[("Purpose", vec![purpose.clone(), purpose])]);
        let results = find_media_items("\"Purpose\" is great", &lookup)
            .await
            .expect("a single candidate needs no popularity");
        let items = results.get("Purpose").expect("Purpose resolved");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identity, "uri:p");
    }

    #[tokio::test]
    async fn test_text_without_quotes_resolves_nothing() {
        let lookup = ScriptedLookup::new(&[]);
        let results = find_media_items("no titles here\n\n", &lookup)
            .await
            .expect("resolution succeeds");
        assert!(results.is_empty());
        assert!(lookup.calls().is_empty());
    }
}
