//! Text predicates for `wait_until_text`.

use regex::Regex;

/// How the expected text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// Full-match pattern when the text compiles as one, substring otherwise.
    #[default]
    Auto,
    /// Full-match regular expression.
    Pattern,
    /// Plain substring containment.
    Substring,
}

impl TextMatch {
    /// Advertised enumeration names, in declaration order.
    pub const NAMES: &'static [&'static str] = &["AUTO", "PATTERN", "SUBSTRING"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AUTO" => Some(Self::Auto),
            "PATTERN" => Some(Self::Pattern),
            "SUBSTRING" => Some(Self::Substring),
            _ => None,
        }
    }
}

/// Compiled text predicate.
#[derive(Debug, Clone)]
pub enum TextMatcher {
    Pattern(Regex),
    Substring(String),
}

impl TextMatcher {
    /// Build the matcher for `text` under `mode`.
    ///
    /// Fails only in [`TextMatch::Pattern`] mode, when `text` is not a valid
    /// regular expression.
    pub fn new(text: &str, mode: TextMatch) -> Result<Self, regex::Error> {
        match mode {
            TextMatch::Substring => Ok(Self::Substring(text.to_string())),
            TextMatch::Pattern => full_match(text).map(Self::Pattern),
            TextMatch::Auto => Ok(full_match(text)
                .map(Self::Pattern)
                .unwrap_or_else(|_| Self::Substring(text.to_string()))),
        }
    }

    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(haystack),
            Self::Substring(needle) => haystack.contains(needle.as_str()),
        }
    }
}

fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{pattern})$"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_uses_full_match_for_valid_patterns() {
        let m = TextMatcher::new(r"Total: \d+", TextMatch::Auto).unwrap();
        assert!(m.matches("Total: 42"));
        assert!(!m.matches("Grand Total: 42"));
    }

    #[test]
    fn auto_falls_back_to_substring() {
        let m = TextMatcher::new("price (USD", TextMatch::Auto).unwrap();
        assert!(matches!(m, TextMatcher::Substring(_)));
        assert!(m.matches("the price (USD) is"));
    }

    #[test]
    fn pattern_mode_rejects_invalid_patterns() {
        assert!(TextMatcher::new("[unclosed", TextMatch::Pattern).is_err());
    }

    #[test]
    fn substring_mode_ignores_metacharacters() {
        let m = TextMatcher::new("a.c", TextMatch::Substring).unwrap();
        assert!(m.matches("xx a.c yy"));
        assert!(!m.matches("abc"));
    }

    #[test]
    fn names_resolve() {
        for name in TextMatch::NAMES {
            assert!(TextMatch::from_name(name).is_some());
        }
        assert_eq!(TextMatch::from_name("auto"), None);
    }
}
