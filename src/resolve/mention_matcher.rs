//! Textual evidence that an artist name appears in a scope of text.
//!
//! A name counts as mentioned when it appears verbatim, when all of its words
//! appear anywhere in the text, or when the part before a group separator
//! ("and", "&", "band") appears verbatim. All comparisons are case-insensitive
//! and an occurrence only counts when it is not glued to a neighbouring letter.

/// Words that may stand in for each other inside occurrence checks.
const SYNONYM_SETS: &[&[&str]] = &[&["and", "&"]];

/// Separators tried in order when matching the leading part of a group name.
const PARTIAL_SEPARATORS: [&str; 3] = ["and", "&", "band"];

/// Lowercased view of a text scope, built once and probed many times.
#[derive(Debug, Clone)]
pub struct MentionScope {
    lowered: String,
}

impl MentionScope {
    pub fn new(text: &str) -> Self {
        Self {
            lowered: text.to_lowercase(),
        }
    }

    /// True when `name` matches under any of the mention rules.
    pub fn mentions(&self, name: &str) -> bool {
        let lowered_name = name.to_lowercase();
        self.mentions_verbatim(&lowered_name)
            || self.mentions_in_parts(&lowered_name)
            || self.mentions_partially(&lowered_name)
    }

    fn mentions_verbatim(&self, lowered_name: &str) -> bool {
        let probe = lowered_name.trim();
        !probe.is_empty() && self.occurs(probe)
    }

    fn mentions_in_parts(&self, lowered_name: &str) -> bool {
        let mut tokens = lowered_name.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return false;
        }
        tokens.all(|token| self.occurs(token))
    }

    fn mentions_partially(&self, lowered_name: &str) -> bool {
        PARTIAL_SEPARATORS.iter().any(|separator| {
            let Some(position) = lowered_name.find(separator) else {
                return false;
            };
            self.mentions_verbatim(&lowered_name[..position])
        })
    }

    /// Full-string occurrence of `probe`, widened to its synonym set.
    fn occurs(&self, probe: &str) -> bool {
        match SYNONYM_SETS.iter().find(|set| set.contains(&probe)) {
            Some(set) => set
                .iter()
                .any(|member| contains_full_string(&self.lowered, member)),
            None => contains_full_string(&self.lowered, probe),
        }
    }
}

/// True when `needle` occurs in `haystack` without a letter directly before
/// or after it. Both sides are expected to be lowercased already.
fn contains_full_string(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        let letter_before = haystack[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphabetic);
        let letter_after = haystack[end..]
            .chars()
            .next()
            .is_some_and(char::is_alphabetic);
        if !letter_before && !letter_after {
            return true;
        }
        // Overlapping occurrences start inside this one.
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// True when `contributor_name` is mentioned in `text` by any rule.
pub fn is_mentioned(contributor_name: &str, text: &str) -> bool {
    MentionScope::new(text).mentions(contributor_name)
}

/// Case-insensitive whole-name occurrence.
pub fn is_mentioned_verbatim(contributor_name: &str, text: &str) -> bool {
    MentionScope::new(text).mentions_verbatim(&contributor_name.to_lowercase())
}

/// Every word of the name occurs somewhere in the text, in any order.
pub fn is_mentioned_in_parts(contributor_name: &str, text: &str) -> bool {
    MentionScope::new(text).mentions_in_parts(&contributor_name.to_lowercase())
}

/// The part of the name before the first matching separator occurs verbatim.
pub fn is_mentioned_partially(contributor_name: &str, text: &str) -> bool {
    MentionScope::new(text).mentions_partially(&contributor_name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{
        contains_full_string, is_mentioned, is_mentioned_in_parts, is_mentioned_partially,
        is_mentioned_verbatim,
    };

    #[test]
    fn test_full_string_requires_non_letter_boundaries() {
        assert!(contains_full_string("the stones rolled", "stones"));
        assert!(contains_full_string("stones", "stones"));
        assert!(contains_full_string("(stones)!", "stones"));
        assert!(contains_full_string("stones1", "stones"));
        assert!(!contains_full_string("milestones", "stones"));
        assert!(!contains_full_string("stonesy", "stones"));
    }

    #[test]
    fn test_full_string_checks_later_occurrences() {
        assert!(contains_full_string("milestones and stones", "stones"));
    }

    #[test]
    fn test_full_string_checks_overlapping_occurrences() {
        assert!(contains_full_string("ba-a-a", "a-a"));
        assert!(is_mentioned_verbatim("A-A", "ba-a-a"));
        assert!(!contains_full_string("ba-a-ab", "a-a"));
        assert!(contains_full_string("xbé-bé-bé", "bé-bé"));
    }

    #[test]
    fn test_verbatim_is_case_insensitive() {
        assert!(is_mentioned_verbatim(
            "Justin Bieber",
            "\"Sorry\" by JUSTIN BIEBER."
        ));
        assert!(is_mentioned_verbatim("Justin Bieber", "Justin Bieber's best"));
        assert!(!is_mentioned_verbatim("Justin Bieber", "Justin Biebers"));
    }

    #[test]
    fn test_in_parts_has_no_substring_false_positive() {
        assert!(!is_mentioned_in_parts(
            "Allen Stone",
            "The Rolling Stones challenged the Beatles in the sixties."
        ));
    }

    #[test]
    fn test_in_parts_accepts_scattered_words() {
        assert!(is_mentioned_in_parts(
            "Allen Stone",
            "Stone, first name Allen, sang it."
        ));
        assert!(!is_mentioned_in_parts("Allen Stone", "Allen sang it."));
        assert!(!is_mentioned_in_parts("   ", "anything"));
    }

    #[test]
    fn test_in_parts_treats_and_and_ampersand_as_synonyms() {
        assert!(is_mentioned_in_parts(
            "Simon & Garfunkel",
            "Simon and Garfunkel recorded it"
        ));
        assert!(is_mentioned_in_parts(
            "Hall and Oates",
            "Hall & Oates recorded it"
        ));
    }

    #[test]
    fn test_partial_uses_prefix_before_separator() {
        assert!(is_mentioned_partially(
            "Florence and the Machine",
            "Florence was on stage"
        ));
        assert!(is_mentioned_partially(
            "Marina & The Diamonds",
            "marina sang"
        ));
        assert!(is_mentioned_partially(
            "The Dave Matthews Band",
            "The Dave Matthews played on"
        ));
        assert!(!is_mentioned_partially("Justin Bieber", "Justin Bieber"));
    }

    #[test]
    fn test_partial_skips_empty_prefix() {
        assert!(!is_mentioned_partially("Band of Horses", "horses everywhere"));
    }

    #[test]
    fn test_is_mentioned_combines_rules() {
        let text = "\"Sorry\" by Justin Bieber.";
        assert!(is_mentioned("Justin Bieber", text));
        assert!(!is_mentioned("Nothing But Thieves", text));
    }
}
