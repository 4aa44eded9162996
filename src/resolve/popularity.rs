//! Popularity-based disambiguation among candidates by the same artists.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::media::MediaItem;

/// Buckets candidates by their exact contributor-name sequence.
///
/// Keys are case-sensitive and order-sensitive. Buckets come back in the
/// order their first member appeared.
pub fn group_by_artist(candidates: &[MediaItem]) -> Vec<Vec<MediaItem>> {
    let mut bucket_by_key: HashMap<Vec<&str>, usize> = HashMap::new();
    let mut buckets: Vec<Vec<MediaItem>> = Vec::new();
    for item in candidates {
        let key: Vec<&str> = item
            .artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect();
        match bucket_by_key.get(&key) {
            Some(&index) => buckets[index].push(item.clone()),
            None => {
                bucket_by_key.insert(key, buckets.len());
                buckets.push(vec![item.clone()]);
            }
        }
    }
    buckets
}

fn popularity_of(item: &MediaItem) -> Result<u32> {
    item.popularity.ok_or_else(|| Error::MissingPopularity {
        identity: item.identity.clone(),
    })
}

/// Most popular item of `group`; ties keep the earlier item.
///
/// Errors as soon as a compared item has no popularity. A single-item group
/// is returned as-is, and an empty group yields `None`.
pub fn pick_most_popular<'a>(group: &'a [MediaItem]) -> Result<Option<&'a MediaItem>> {
    let mut items = group.iter();
    let Some(first) = items.next() else {
        return Ok(None);
    };
    items
        .try_fold(first, |best, item| -> Result<&'a MediaItem> {
            let best_popularity = popularity_of(best)?;
            let popularity = popularity_of(item)?;
            Ok(if popularity > best_popularity {
                item
            } else {
                best
            })
        })
        .map(Some)
}

/// Keeps only the most popular candidate per contributor list.
pub fn reduce_by_popularity_per_artist(candidates: &[MediaItem]) -> Result<Vec<MediaItem>> {
    let mut reduced = Vec::new();
    for group in group_by_artist(candidates) {
        if let Some(best) = pick_most_popular(&group)? {
            reduced.push(best.clone());
        }
    }
    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::{group_by_artist, pick_most_popular, reduce_by_popularity_per_artist};
    use crate::error::Error;
    use crate::media::{MediaItem, MediaKind};

    fn item(artists: &[&str], popularity: Option<u32>, identity: &str) -> MediaItem {
        MediaItem::new(MediaKind::Song, "American Pie", artists, popularity, identity)
    }

    #[test]
    fn test_reduce_keeps_most_popular_per_artist() {
        let candidates = vec![
            item(&["Don McLean"], Some(1), "uri:1"),
            item(&["Don McLean"], Some(2), "uri:2"),
        ];
        let reduced = reduce_by_popularity_per_artist(&candidates).expect("popularity present");
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced[0].identity, "uri:2");
    }

    #[test]
    fn test_distinct_artists_each_keep_one() {
        let candidates = vec![
            item(&["Don McLean"], Some(10), "uri:1"),
            item(&["Madonna"], Some(30), "uri:2"),
            item(&["Don McLean"], Some(20), "uri:3"),
        ];
        let reduced = reduce_by_popularity_per_artist(&candidates).expect("popularity present");
        let identities: Vec<&str> = reduced.iter().map(|item| item.identity.as_str()).collect();
        assert_eq!(identities, vec!["uri:3", "uri:2"]);
    }

    #[test]
    fn test_grouping_is_case_and_order_sensitive() {
        let candidates = vec![
            item(&["Don McLean"], Some(1), "uri:1"),
            item(&["don mclean"], Some(2), "uri:2"),
            item(&["A", "B"], Some(3), "uri:3"),
            item(&["B", "A"], Some(4), "uri:4"),
            item(&["A", "B"], Some(5), "uri:5"),
        ];
        let groups = group_by_artist(&candidates);
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 1, 2, 1]);
    }

    #[test]
    fn test_ties_keep_earlier_item() {
        let group = vec![
            item(&["Don McLean"], Some(5), "uri:first"),
            item(&["Don McLean"], Some(5), "uri:second"),
        ];
        let best = pick_most_popular(&group)
            .expect("popularity present")
            .expect("group not empty");
        assert_eq!(best.identity, "uri:first");
    }

    #[test]
    fn test_never_returns_less_popular_item() {
        let group = vec![
            item(&["X"], Some(3), "uri:a"),
            item(&["X"], Some(9), "uri:b"),
            item(&["X"], Some(7), "uri:c"),
        ];
        let best = pick_most_popular(&group)
            .expect("popularity present")
            .expect("group not empty");
        assert!(group
            .iter()
            .all(|other| other.popularity <= best.popularity));
    }

    #[test]
    fn test_missing_popularity_fails_on_comparison() {
        let group = vec![
            item(&["Don McLean"], Some(1), "uri:1"),
            item(&["Don McLean"], None, "uri:2"),
        ];
        let error = pick_most_popular(&group).expect_err("missing popularity must fail");
        assert!(matches!(
            error,
            Error::MissingPopularity { ref identity } if identity == "uri:2"
        ));
    }

    #[test]
    fn test_single_item_group_needs_no_popularity() {
        let group = vec![item(&["Don McLean"], None, "uri:1")];
        let best = pick_most_popular(&group)
            .expect("no comparison happens")
            .expect("group not empty");
        assert_eq!(best.identity, "uri:1");
        assert!(pick_most_popular(&[]).expect("empty is fine").is_none());
    }
}
