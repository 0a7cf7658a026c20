//! Text normalization and the exclusion filters.
//!
//! Post text is first reduced to ASCII with newlines flattened to spaces.
//! The normalized text is then rejected if, in this order:
//!
//! 1. the profanity predicate flags it,
//! 2. it is shorter than the minimum length,
//! 3. it contains any excluded substring.

use std::fmt;

use crate::config::FilterConfig;
use crate::profanity::ProfanityCheck;

/// Drop every non-ASCII character and replace each `\n` with a space.
pub fn normalize_text(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// Why a post was excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The profanity predicate flagged the text.
    Profanity,
    /// The normalized text is shorter than the minimum.
    TooShort {
        /// Normalized length.
        length: usize,
        /// Configured minimum.
        minimum: usize,
    },
    /// The text contains an excluded substring.
    ExcludedSubstring {
        /// The first excluded substring found.
        token: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profanity => write!(f, "profanity"),
            Self::TooShort { length, minimum } => {
                write!(f, "too short ({length} < {minimum})")
            }
            Self::ExcludedSubstring { token } => write!(f, "contains {token:?}"),
        }
    }
}

/// The exclusion filters, applied to already-normalized text.
pub struct ContentFilter {
    min_length: usize,
    excluded_substrings: Vec<String>,
    profanity: Box<dyn ProfanityCheck + Send + Sync>,
}

impl ContentFilter {
    /// Build a filter from its thresholds and a profanity predicate.
    pub fn new(config: &FilterConfig, profanity: Box<dyn ProfanityCheck + Send + Sync>) -> Self {
        Self {
            min_length: config.min_length,
            excluded_substrings: config.excluded_substrings.clone(),
            profanity,
        }
    }

    /// Accept `text` or report the first filter that rejects it.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] describing why the text is excluded.
    pub fn check(&self, text: &str) -> Result<(), Rejection> {
        if self.profanity.is_profane(text) {
            return Err(Rejection::Profanity);
        }

        let length = text.chars().count();
        if length < self.min_length {
            return Err(Rejection::TooShort {
                length,
                minimum: self.min_length,
            });
        }

        if let Some(token) = self
            .excluded_substrings
            .iter()
            .find(|token| text.contains(token.as_str()))
        {
            return Err(Rejection::ExcludedSubstring {
                token: token.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profanity::WordListCheck;

    /// Predicate that flags texts containing a marker, standing in for a classifier.
    struct MarkerCheck(&'static str);

    impl ProfanityCheck for MarkerCheck {
        fn is_profane(&self, text: &str) -> bool {
            text.contains(self.0)
        }
    }

    fn filter(excluded: &[&str]) -> ContentFilter {
        ContentFilter::new(
            &FilterConfig {
                min_length: 120,
                excluded_substrings: excluded.iter().map(|s| (*s).to_owned()).collect(),
            },
            Box::new(WordListCheck::default()),
        )
    }

    fn text_of_len(n: usize) -> String {
        "a".repeat(n)
    }

    #[test]
    fn normalization_strips_non_ascii_and_newlines() {
        assert_eq!(
            normalize_text("Launch day \u{1F680}\nGo for orbit\u{2014}now"),
            "Launch day  Go for orbitnow"
        );
        assert_eq!(normalize_text("caf\u{e9}"), "caf");
        assert_eq!(normalize_text("a\r\nb"), "a\r b");
    }

    #[test]
    fn length_is_measured_after_normalization() {
        let f = filter(&["@", "http", "#"]);
        // 119 ASCII characters plus emoji that normalization removes.
        let raw = format!("{}\u{1F600}\u{1F600}", text_of_len(119));
        let text = normalize_text(&raw);
        assert_eq!(
            f.check(&text),
            Err(Rejection::TooShort {
                length: 119,
                minimum: 120
            })
        );
        assert_eq!(f.check(&text_of_len(120)), Ok(()));
    }

    #[test]
    fn excluded_substrings_follow_configuration() {
        let extended = filter(&["@", "http", "#"]);
        let classic = filter(&["@", "http"]);
        let tagged = format!("{} #launch", text_of_len(120));

        assert_eq!(
            extended.check(&tagged),
            Err(Rejection::ExcludedSubstring {
                token: "#".to_owned()
            })
        );
        assert_eq!(classic.check(&tagged), Ok(()));

        for token in ["@nasa", "see https://nasa.gov", "http"] {
            let text = format!("{} {token}", text_of_len(120));
            assert!(classic.check(&text).is_err(), "{token} should be excluded");
        }
    }

    #[test]
    fn profanity_is_checked_first() {
        let f = ContentFilter::new(
            &FilterConfig {
                min_length: 120,
                excluded_substrings: vec!["@".to_owned()],
            },
            Box::new(MarkerCheck("BAD")),
        );
        assert_eq!(f.check("BAD @ short"), Err(Rejection::Profanity));
    }

    #[test]
    fn word_list_rejects_long_clean_looking_profane_text() {
        let f = filter(&["@", "http", "#"]);
        let text = format!("{} shit", text_of_len(130).replace("aaaa", "aaa "));
        assert_eq!(f.check(&text), Err(Rejection::Profanity));
    }

    #[test]
    fn rejection_messages_are_readable() {
        assert_eq!(Rejection::Profanity.to_string(), "profanity");
        assert_eq!(
            Rejection::TooShort {
                length: 3,
                minimum: 120
            }
            .to_string(),
            "too short (3 < 120)"
        );
        assert_eq!(
            Rejection::ExcludedSubstring {
                token: "#".to_owned()
            }
            .to_string(),
            "contains \"#\""
        );
    }
}
