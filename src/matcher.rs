use regex_automata::meta::Regex;
use regex_automata::util::syntax;
use regex_automata::Input;
use tracing::{debug, info};

/// Whole-word, case-insensitive phrase matcher.
///
/// Each phrase is compiled once into a case-insensitive literal pattern;
/// phrase text is free text, never pattern syntax, so characters like
/// apostrophes and parentheses always match literally. A phrase counts as
/// matched when some occurrence in the query is bounded on both sides by a
/// non-word character or the edge of the string.
///
/// Matching holds no mutable state: a matcher can be shared across
/// concurrent searches through `&self`.
pub struct PhraseMatcher {
    phrases: Vec<CompiledPhrase>,
}

struct CompiledPhrase {
    text: String,
    pattern: Regex,
}

impl PhraseMatcher {
    /// Compile a phrase set, preserving its order for result ordering.
    ///
    /// Phrases are expected to be non-empty and deduplicated (the
    /// dictionary loader guarantees both).
    pub fn compile(phrases: Vec<String>) -> Result<Self, regex_automata::meta::BuildError> {
        debug!("Compiling {} phrase patterns", phrases.len());

        let phrases = phrases
            .into_iter()
            .map(|text| {
                let pattern = Regex::builder()
                    .syntax(syntax::Config::new().case_insensitive(true))
                    .build(&regex_syntax::escape(&text))?;
                Ok(CompiledPhrase { text, pattern })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("Compiled phrase matcher with {} phrases", phrases.len());
        Ok(Self { phrases })
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Find every phrase with a whole-word occurrence in `query`.
    ///
    /// Results keep the stored phrase casing and come back in phrase-set
    /// order. Never fails: malformed or empty query text simply matches
    /// nothing.
    pub fn find_matches(&self, query: &str) -> Vec<String> {
        self.phrases
            .iter()
            .filter(|phrase| phrase.occurs_whole_word_in(query))
            .map(|phrase| phrase.text.clone())
            .collect()
    }
}

impl CompiledPhrase {
    fn occurs_whole_word_in(&self, query: &str) -> bool {
        // occurrences of a self-overlapping phrase can overlap, and a later
        // overlapping occurrence may satisfy the boundary test where an
        // earlier one did not; resume one character past each failed
        // occurrence start so no start position is skipped
        let mut start = 0;
        while let Some(m) = self.pattern.search(&Input::new(query).range(start..)) {
            if boundary_before(query, m.start()) && boundary_after(query, m.end()) {
                return true;
            }

            let skipped = query[m.start()..].chars().next().map_or(1, char::len_utf8);
            start = m.start() + skipped;
            if start > query.len() {
                break;
            }
        }

        false
    }
}

/// Word characters for boundary purposes: alphanumerics, underscore, and
/// apostrophes. Apostrophes glue possessives and contractions to their
/// word, so `egg` does not hit inside `egg's`.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '\'' || ch == '\u{2019}'
}

fn boundary_before(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().is_none_or(|ch| !is_word_char(ch))
}

fn boundary_after(text: &str, at: usize) -> bool {
    text[at..].chars().next().is_none_or(|ch| !is_word_char(ch))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(phrases: &[&str]) -> PhraseMatcher {
        PhraseMatcher::compile(phrases.iter().map(|p| p.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_whole_word_match() {
        let m = matcher(&["egg"]);
        assert_eq!(m.find_matches("I have egg omelet"), vec!["egg"]);
    }

    #[test]
    fn test_no_match_inside_longer_word() {
        let m = matcher(&["egg"]);
        assert!(m.find_matches("I have eggplant omelet").is_empty());
        assert!(m.find_matches("bootleggers").is_empty());
    }

    #[test]
    fn test_possessive_does_not_match_bare_word() {
        let m = matcher(&["egg"]);
        assert!(m.find_matches("I have egg's omelet").is_empty());
        // typographic apostrophe behaves the same
        assert!(m.find_matches("I have egg\u{2019}s omelet").is_empty());
    }

    #[test]
    fn test_case_insensitive_preserves_stored_casing() {
        let m = matcher(&["Fruit juice"]);
        assert_eq!(m.find_matches("FRESH FRUIT JUICE"), vec!["Fruit juice"]);
    }

    #[test]
    fn test_match_at_string_edges() {
        let m = matcher(&["juice"]);
        assert_eq!(m.find_matches("juice"), vec!["juice"]);
        assert_eq!(m.find_matches("juice first"), vec!["juice"]);
        assert_eq!(m.find_matches("drink juice"), vec!["juice"]);
    }

    #[test]
    fn test_punctuation_is_a_boundary() {
        let m = matcher(&["juice"]);
        assert_eq!(m.find_matches("apple, juice, eggs"), vec!["juice"]);
        assert_eq!(m.find_matches("(juice)"), vec!["juice"]);
    }

    #[test]
    fn test_phrase_with_apostrophe_matches_literally() {
        let m = matcher(&["Egg's omelet"]);
        assert_eq!(
            m.find_matches("I love egg's omelet today"),
            vec!["Egg's omelet"]
        );
        assert!(m.find_matches("I love eggs omelet today").is_empty());
    }

    #[test]
    fn test_metacharacters_treated_literally() {
        let m = matcher(&["Soda (diet)", "Mac & cheese"]);
        assert_eq!(m.find_matches("some Soda (diet) here"), vec!["Soda (diet)"]);
        assert_eq!(m.find_matches("love mac & cheese"), vec!["Mac & cheese"]);
        assert!(m.find_matches("Soda Xdiet)").is_empty());
    }

    #[test]
    fn test_results_in_phrase_order() {
        let m = matcher(&["eggs", "juice", "milk"]);
        assert_eq!(
            m.find_matches("milk then juice then eggs"),
            vec!["eggs", "juice", "milk"]
        );
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let m = matcher(&["juice"]);
        assert!(m.find_matches("").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let m = matcher(&["Fruit juices", "Juices", "eggs"]);
        let query = "I wake up to some fruit juices and eggs";
        let first = m.find_matches(query);
        let second = m.find_matches(query);
        assert_eq!(first, second);
        assert_eq!(first, vec!["Fruit juices", "Juices", "eggs"]);
    }

    #[test]
    fn test_overlapping_occurrences_still_match() {
        let m = matcher(&["juice juice"]);
        // the leftmost occurrence sits inside a longer word; the valid
        // whole-word occurrence overlaps it and must still be found
        assert_eq!(m.find_matches("xjuice juice juice"), vec!["juice juice"]);
        assert_eq!(m.find_matches("a juice juice here"), vec!["juice juice"]);
        assert!(m.find_matches("xjuice juicex").is_empty());
    }

    #[test]
    fn test_overlapping_occurrences_unicode_prefix() {
        let m = matcher(&["été été"]);
        assert_eq!(m.find_matches("xété été été"), vec!["été été"]);
    }

    #[test]
    fn test_multiword_phrase_not_split_by_inner_boundary() {
        let m = matcher(&["Fruit juice"]);
        // inner space must match literally, not as any separator
        assert!(m.find_matches("Fruit-juice").is_empty());
    }

    #[test]
    fn test_unicode_query() {
        let m = matcher(&["jus de pomme"]);
        assert_eq!(m.find_matches("un jus de pomme frais"), vec!["jus de pomme"]);
        assert!(m.find_matches("unjus de pommefrais").is_empty());
    }

    #[test]
    fn test_len_and_is_empty() {
        assert!(matcher(&[]).is_empty());
        assert_eq!(matcher(&["a", "b"]).len(), 2);
    }
}
