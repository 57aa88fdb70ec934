use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::errors::{Result, TaggerError};
use crate::sentence::{TaggedSentence, TaggedToken};

/// Tag the Penn Treebank uses for empty elements such as traces.
pub const DEFAULT_PLACEHOLDER_TAG: &str = "-NONE-";

/// Marker substituted for rare and unseen words.
pub const DEFAULT_UNKNOWN_MARKER: &str = "<UNK>";

/// Corpus preprocessor.
///
/// Cleans the training corpus before estimation: tokens carrying the placeholder tag are
/// dropped, and words whose corpus frequency does not exceed the rare-word threshold are
/// replaced by the unknown-word marker.
#[derive(Clone, Debug)]
pub struct Preprocessor {
    placeholder_tag: String,
    unknown_marker: String,
    rare_threshold: usize,
}

impl Preprocessor {
    /// Creates a new preprocessor.
    ///
    /// # Arguments
    ///
    /// * `placeholder_tag` - Tokens with this tag are removed from the corpus.
    /// * `unknown_marker` - A word substituted for rare words.
    ///
    /// # Errors
    ///
    /// If either argument is empty, an error variant will be returned.
    pub fn new<P, U>(placeholder_tag: P, unknown_marker: U) -> Result<Self>
    where
        P: Into<String>,
        U: Into<String>,
    {
        let placeholder_tag = placeholder_tag.into();
        let unknown_marker = unknown_marker.into();
        if placeholder_tag.is_empty() {
            return Err(TaggerError::invalid_argument(
                "placeholder_tag",
                "must not be empty",
            ));
        }
        if unknown_marker.is_empty() {
            return Err(TaggerError::invalid_argument(
                "unknown_marker",
                "must not be empty",
            ));
        }
        Ok(Self {
            placeholder_tag,
            unknown_marker,
            rare_threshold: 1,
        })
    }

    /// Sets the rare-word threshold. Words occurring at most `n` times are substituted.
    ///
    /// The default value is 1.
    pub fn rare_threshold(mut self, n: usize) -> Self {
        self.rare_threshold = n;
        self
    }

    #[inline]
    pub fn placeholder_tag(&self) -> &str {
        &self.placeholder_tag
    }

    #[inline]
    pub fn unknown_marker(&self) -> &str {
        &self.unknown_marker
    }

    /// Drops every token tagged with the placeholder tag. The remaining tokens keep their order,
    /// and sentences may become empty.
    pub fn remove_placeholder_tag(&self, sentences: Vec<TaggedSentence>) -> Vec<TaggedSentence> {
        sentences
            .into_iter()
            .map(|sentence| {
                sentence
                    .into_iter()
                    .filter(|token| token.tag != self.placeholder_tag)
                    .collect()
            })
            .collect()
    }

    /// Replaces words occurring at most `rare_threshold` times in the whole corpus with the
    /// unknown-word marker.
    pub fn substitute_rare_words(&self, sentences: Vec<TaggedSentence>) -> Vec<TaggedSentence> {
        let is_rare: Vec<bool> = {
            let mut freqs: HashMap<&str, usize> = HashMap::new();
            for sentence in &sentences {
                for word in sentence.words() {
                    *freqs.entry(word).or_insert(0) += 1;
                }
            }
            sentences
                .iter()
                .flat_map(TaggedSentence::words)
                .map(|word| freqs[word] <= self.rare_threshold)
                .collect()
        };

        let mut is_rare = is_rare.into_iter();
        sentences
            .into_iter()
            .map(|sentence| {
                sentence
                    .into_iter()
                    .map(|token| {
                        if is_rare.next().unwrap_or(false) {
                            TaggedToken::new(self.unknown_marker.clone(), token.tag)
                        } else {
                            token
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Runs [`Self::remove_placeholder_tag`] followed by [`Self::substitute_rare_words`].
    pub fn process(&self, sentences: Vec<TaggedSentence>) -> Vec<TaggedSentence> {
        self.substitute_rare_words(self.remove_placeholder_tag(sentences))
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            placeholder_tag: DEFAULT_PLACEHOLDER_TAG.into(),
            unknown_marker: DEFAULT_UNKNOWN_MARKER.into(),
            rare_threshold: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec;

    fn sent(tokens: &[(&str, &str)]) -> TaggedSentence {
        tokens.iter().copied().collect()
    }

    #[test]
    fn test_new_empty_marker() {
        let p = Preprocessor::new("-NONE-", "");

        assert!(p.is_err());
    }

    #[test]
    fn test_remove_placeholder_tag() {
        let p = Preprocessor::default();
        let sents = vec![
            sent(&[("*-1", "-NONE-"), ("He", "PRP"), ("ran", "VBD"), ("*T*", "-NONE-")]),
            sent(&[("0", "-NONE-")]),
        ];

        let sents = p.remove_placeholder_tag(sents);

        assert_eq!(vec![sent(&[("He", "PRP"), ("ran", "VBD")]), sent(&[])], sents);
    }

    #[test]
    fn test_remove_custom_placeholder_tag() {
        let p = Preprocessor::new("X", "<UNK>").unwrap();
        let sents = vec![sent(&[("a", "X"), ("-NONE-", "-NONE-")])];

        let sents = p.remove_placeholder_tag(sents);

        assert_eq!(vec![sent(&[("-NONE-", "-NONE-")])], sents);
    }

    #[test]
    fn test_substitute_rare_words() {
        let p = Preprocessor::default();
        let sents = vec![
            sent(&[("the", "DT"), ("dog", "NN")]),
            sent(&[("the", "DT"), ("cat", "NN"), ("dog", "NN")]),
        ];

        let sents = p.substitute_rare_words(sents);

        assert_eq!(
            vec![
                sent(&[("the", "DT"), ("dog", "NN")]),
                sent(&[("the", "DT"), ("<UNK>", "NN"), ("dog", "NN")]),
            ],
            sents
        );
    }

    #[test]
    fn test_substitute_rare_words_threshold() {
        let p = Preprocessor::default().rare_threshold(2);
        let sents = vec![
            sent(&[("the", "DT"), ("dog", "NN")]),
            sent(&[("the", "DT"), ("dog", "NN")]),
            sent(&[("the", "DT"), ("cat", "NN")]),
        ];

        let sents = p.substitute_rare_words(sents);

        assert_eq!(
            vec![
                sent(&[("the", "DT"), ("<UNK>", "NN")]),
                sent(&[("the", "DT"), ("<UNK>", "NN")]),
                sent(&[("the", "DT"), ("<UNK>", "NN")]),
            ],
            sents
        );
    }

    #[test]
    fn test_process_counts_after_cleaning() {
        let p = Preprocessor::default();
        // "0" occurs twice, but once under the placeholder tag.
        let sents = vec![
            sent(&[("0", "-NONE-"), ("0", "CD"), ("x", "NN")]),
            sent(&[("x", "NN")]),
        ];

        let sents = p.process(sents);

        assert_eq!(
            vec![sent(&[("<UNK>", "CD"), ("x", "NN")]), sent(&[("x", "NN")])],
            sents
        );
    }

    #[test]
    fn test_process_idempotent() {
        let p = Preprocessor::default();
        let sents = vec![
            sent(&[("*", "-NONE-"), ("a", "DT"), ("b", "NN"), ("c", "VB")]),
            sent(&[("a", "DT"), ("b", "NN"), ("d", "JJ")]),
        ];

        let once = p.process(sents);
        let twice = p.process(once.clone());

        assert_eq!(once, twice);
    }
}
