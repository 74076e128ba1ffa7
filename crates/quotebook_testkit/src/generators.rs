//! Property-based test generators using proptest.
//!
//! Provides strategies for generating quote records and lists that satisfy
//! the record invariants (non-blank, trimmed fields).

use proptest::prelude::*;
use quotebook_core::{QuoteList, QuoteRecord};
use std::ops::Range;

/// Largest remote list a sync ever fetches by default.
pub const MAX_REMOTE: usize = 5;

/// Strategy for quote text: printable words, never blank.
pub fn quote_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z .,']{0,40}").expect("Invalid regex")
}

/// Strategy for category names drawn from a small pool, so lists share
/// categories the way real ones do.
pub fn category_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Life", "Success", "Motivation", "Inspiration", "Humor"])
        .prop_map(|c| c.to_string())
}

/// Strategy for valid quote records.
pub fn quote_strategy() -> impl Strategy<Value = QuoteRecord> {
    (quote_text_strategy(), category_strategy()).prop_map(|(text, category)| {
        QuoteRecord::new(text, category).expect("generated fields are never blank")
    })
}

/// Strategy for quote lists with a length in `len`.
pub fn quote_list_strategy(len: Range<usize>) -> impl Strategy<Value = QuoteList> {
    prop::collection::vec(quote_strategy(), len)
}

/// Strategy for remote lists: `Server` quotes, at most [`MAX_REMOTE`] long.
pub fn remote_list_strategy() -> impl Strategy<Value = QuoteList> {
    prop::collection::vec(
        quote_text_strategy().prop_map(|text| {
            QuoteRecord::new(text, "Server").expect("generated fields are never blank")
        }),
        0..=MAX_REMOTE,
    )
}

/// Configuration for property-based tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn generated_quotes_are_trimmed(quote in quote_strategy()) {
            prop_assert_eq!(quote.text(), quote.text().trim());
            prop_assert!(!quote.text().is_empty());
        }

        #[test]
        fn remote_lists_are_bounded(remote in remote_list_strategy()) {
            prop_assert!(remote.len() <= MAX_REMOTE);
            prop_assert!(remote.iter().all(|q| q.category() == "Server"));
        }
    }
}
