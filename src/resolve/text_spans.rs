//! Quoted-title extraction and paragraph segmentation.

const QUOTE: char = '"';

/// Returns every span enclosed by a pair of double quotes, left to right.
///
/// Quotes pair up in order of appearance. A trailing unmatched quote opens
/// nothing, and blank spans are skipped. Repeated titles are all kept.
pub fn find_quoted_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut open_at: Option<usize> = None;
    for (index, ch) in text.char_indices() {
        if ch != QUOTE {
            continue;
        }
        match open_at.take() {
            None => open_at = Some(index + QUOTE.len_utf8()),
            Some(start) => {
                let span = &text[start..index];
                if !span.trim().is_empty() {
                    tokens.push(span.to_string());
                }
            }
        }
    }
    tokens
}

/// Trims a quoted span and drops one trailing `.` or `,`.
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix(|ch: char| ch == '.' || ch == ',')
        .unwrap_or(trimmed)
        .to_string()
}

/// Candidate names quoted in `text`, in order and with duplicates.
pub fn extract_candidate_names(text: &str) -> Vec<String> {
    find_quoted_tokens(text)
        .iter()
        .map(|token| normalize_name(token))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Splits text into trimmed, non-empty lines.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
