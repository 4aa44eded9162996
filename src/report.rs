//! Human-readable rendering of resolution results.

use crate::media::MediaItem;
use crate::resolve::ResultSet;

fn format_item(item: &MediaItem) -> String {
    let popularity = item
        .popularity
        .map(|value| value.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{} - {} (popularity {}) [{}]",
        item.name,
        item.artist_names(),
        popularity,
        item.identity
    )
}

/// One block per quoted name, one indented line per resolved item.
pub fn format_result_set(results: &ResultSet) -> String {
    if results.is_empty() {
        return "No quoted titles found.\n".to_string();
    }
    let mut out = String::new();
    for (name, items) in results.iter() {
        out.push_str(&format!("\"{name}\"\n"));
        if items.is_empty() {
            out.push_str("  no match\n");
            continue;
        }
        for item in items {
            out.push_str(&format!("  {} {}\n", item.kind.label(), format_item(item)));
        }
    }
    out
}
