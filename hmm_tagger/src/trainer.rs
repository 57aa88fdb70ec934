use alloc::vec;
use alloc::vec::Vec;

use crate::model::{
    EmissionTable, Model, StartDistribution, TagSet, TransitionTable, Vocabulary,
};
use crate::preprocess::Preprocessor;
use crate::sentence::{TaggedSentence, TaggedToken};

/// Estimates the start-tag distribution.
///
/// Each non-empty sentence contributes the tag of its first token. No smoothing is applied, so
/// tags never seen sentence-initially get probability 0.
pub fn estimate_start_distribution(
    sentences: &[TaggedSentence],
    tags: &TagSet,
) -> StartDistribution {
    let mut counts = vec![0usize; tags.len()];
    let mut total = 0usize;
    for sentence in sentences {
        if let Some(tag) = sentence.tokens().first().and_then(|t| tags.get(t.tag())) {
            counts[tag] += 1;
            total += 1;
        }
    }
    let probs = counts
        .into_iter()
        .map(|count| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        })
        .collect();
    StartDistribution { probs }
}

/// Estimates the Laplace-smoothed transition table.
///
/// Every tag sequence is wrapped in `<s>` and `</s>`, and
/// `P(next | prev) = (count(prev, next) + 1) / (total(prev) + K)`, where `K` is the number of
/// distinct tags observed as a previous tag, `<s>` included. Rows of tags never observed as a
/// previous tag stay 0.
pub fn estimate_transitions(sentences: &[TaggedSentence], tags: &TagSet) -> TransitionTable {
    let n_tags = tags.len();
    let width = n_tags + 1;
    let bos = n_tags;
    let eos = n_tags;

    let mut counts = vec![0usize; width * width];
    let mut totals = vec![0usize; width];
    for sentence in sentences {
        let mut prev = bos;
        for tag in sentence.tags() {
            if let Some(next) = tags.get(tag) {
                counts[prev * width + next] += 1;
                totals[prev] += 1;
                prev = next;
            }
        }
        counts[prev * width + eos] += 1;
        totals[prev] += 1;
    }

    let n_prev = totals.iter().filter(|&&total| total != 0).count();
    let mut probs = vec![0.0; width * width];
    for (prev, &total) in totals.iter().enumerate() {
        if total == 0 {
            continue;
        }
        let denom = (total + n_prev) as f64;
        for next in 0..width {
            let idx = prev * width + next;
            probs[idx] = (counts[idx] + 1) as f64 / denom;
        }
    }
    TransitionTable { n_tags, probs }
}

/// Estimates the Laplace-smoothed emission table.
///
/// `P(word | tag) = (count(tag, word) + 1) / (total(tag) + V)`, where `V` is the vocabulary
/// size.
pub fn estimate_emissions(
    sentences: &[TaggedSentence],
    tags: &TagSet,
    vocabulary: &Vocabulary,
) -> EmissionTable {
    let n_words = vocabulary.len();
    let mut counts = vec![0usize; tags.len() * n_words];
    let mut totals = vec![0usize; tags.len()];
    for token in sentences.iter().flat_map(TaggedSentence::iter_tokens) {
        if let (Some(tag), Some(word)) = (tags.get(token.tag()), vocabulary.get(token.word())) {
            counts[tag * n_words + word] += 1;
            totals[tag] += 1;
        }
    }

    let mut probs = vec![0.0; tags.len() * n_words];
    for (tag, &total) in totals.iter().enumerate() {
        if total == 0 {
            continue;
        }
        let denom = (total + n_words) as f64;
        for word in 0..n_words {
            let idx = tag * n_words + word;
            probs[idx] = (counts[idx] + 1) as f64 / denom;
        }
    }
    EmissionTable { n_words, probs }
}

/// Builds a model from already preprocessed sentences.
///
/// # Arguments
///
/// * `sentences` - Sentences returned by [`Preprocessor::process`].
/// * `unknown_marker` - The marker the preprocessor substituted for rare words.
pub fn estimate(sentences: &[TaggedSentence], unknown_marker: &str) -> Model {
    let tags = TagSet::from_sentences(sentences);
    let vocabulary = Vocabulary::from_sentences(sentences, unknown_marker);
    let start = estimate_start_distribution(sentences, &tags);
    let transitions = estimate_transitions(sentences, &tags);
    let emissions = estimate_emissions(sentences, &tags, &vocabulary);
    Model {
        tags,
        vocabulary,
        start,
        transitions,
        emissions,
    }
}

/// Trainer.
///
/// Collects tagged sentences, preprocesses them, and estimates a [`Model`].
///
/// # Examples
///
/// ```
/// use hmm_tagger::{Preprocessor, TaggedSentence, Trainer};
///
/// let mut trainer = Trainer::new(Preprocessor::default());
/// trainer.push_sentence(TaggedSentence::from_tagged("the/DET dog/NOUN", '/').unwrap());
/// trainer.push_sentence([("the", "DET"), ("cat", "NOUN")]);
///
/// let model = trainer.train();
/// assert_eq!(1.0, model.start_prob("DET"));
/// assert!(model.vocabulary().contains("the"));
/// assert!(!model.vocabulary().contains("dog"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Trainer {
    preprocessor: Preprocessor,
    sentences: Vec<TaggedSentence>,
}

impl Trainer {
    pub fn new(preprocessor: Preprocessor) -> Self {
        Self {
            preprocessor,
            sentences: vec![],
        }
    }

    /// Adds a sentence given as tagged tokens.
    pub fn push_sentence<I, T>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<TaggedToken>,
    {
        self.sentences.push(tokens.into_iter().collect());
    }

    #[inline]
    pub fn n_sentences(&self) -> usize {
        self.sentences.len()
    }

    /// Preprocesses the collected sentences and estimates the model.
    ///
    /// An empty corpus yields a model with empty tables.
    pub fn train(self) -> Model {
        let sentences = self.preprocessor.process(self.sentences);
        estimate(&sentences, self.preprocessor.unknown_marker())
    }
}
