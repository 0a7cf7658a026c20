//! Profanity predicate used by the content filter.
//!
//! The filter only needs a yes/no answer per text, so the classifier sits
//! behind [`ProfanityCheck`]. The shipped [`WordListCheck`] flags a text
//! when any of its words appears in a case-insensitive word list.

use std::collections::HashSet;

/// Words flagged by the built-in list.
const DEFAULT_WORDS: &[&str] = &[
    "arse", "arsehole", "ass", "asshole", "bastard", "bitch", "bitches", "bollocks",
    "bullshit", "crap", "cunt", "damn", "dick", "dickhead", "douche", "douchebag", "fck",
    "fuck", "fucked", "fucker", "fuckers", "fucking", "fucks", "goddamn", "horseshit",
    "jackass", "motherfucker", "motherfucking", "piss", "pissed", "prick", "shit",
    "shits", "shitty", "slut", "stfu", "twat", "wanker", "whore", "wtf",
];

/// A boolean classifier over post text.
pub trait ProfanityCheck {
    /// Whether `text` should be treated as profane.
    fn is_profane(&self, text: &str) -> bool;
}

/// Word-list classifier.
///
/// Text is split on every non-alphanumeric ASCII character and each piece
/// is compared lowercase against the list.
#[derive(Debug, Clone)]
pub struct WordListCheck {
    words: HashSet<String>,
}

impl Default for WordListCheck {
    /// Classifier using only the built-in word list.
    fn default() -> Self {
        Self::with_extra_words(std::iter::empty::<&str>())
    }
}

impl WordListCheck {
    /// Classifier using the built-in list plus `extra`.
    pub fn with_extra_words<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = DEFAULT_WORDS
            .iter()
            .map(|w| (*w).to_owned())
            .chain(
                extra
                    .into_iter()
                    .map(|w| w.as_ref().trim().to_ascii_lowercase())
                    .filter(|w| !w.is_empty()),
            )
            .collect();
        Self { words }
    }

    /// Number of distinct words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }
}

impl ProfanityCheck for WordListCheck {
    fn is_profane(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| self.words.contains(&token.to_ascii_lowercase()))
    }
}
