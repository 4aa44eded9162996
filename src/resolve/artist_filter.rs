//! Narrowing candidate sets by artist mentions.

use log::debug;

use crate::media::MediaItem;
use crate::resolve::mention_matcher::MentionScope;

/// Candidates with at least one contributor mentioned in `text`.
pub fn filter_by_mentioned_artist(candidates: &[MediaItem], text: &str) -> Vec<MediaItem> {
    let scope = MentionScope::new(text);
    candidates
        .iter()
        .filter(|item| item.artists.iter().any(|artist| scope.mentions(&artist.name)))
        .cloned()
        .collect()
}

/// Mentioned candidates, or every candidate when none is mentioned.
pub fn filter_if_any_artists_mentioned(candidates: &[MediaItem], text: &str) -> Vec<MediaItem> {
    let filtered = filter_by_mentioned_artist(candidates, text);
    if filtered.is_empty() {
        candidates.to_vec()
    } else {
        filtered
    }
}

/// Paragraph-scoped filter that falls back to the whole document when the
/// paragraph left more than one candidate and removed none of them.
pub fn filter_if_any_artists_mentioned_greedy(
    candidates: &[MediaItem],
    paragraph_text: &str,
    whole_text: &str,
) -> Vec<MediaItem> {
    let filtered = filter_if_any_artists_mentioned(candidates, paragraph_text);
    if filtered.len() == candidates.len() && candidates.len() > 1 {
        debug!(
            "Paragraph scope kept all {} candidates; widening to whole document",
            candidates.len()
        );
        return filter_if_any_artists_mentioned(candidates, whole_text);
    }
    filtered
}
