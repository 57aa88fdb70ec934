use alloc::string::String;
use alloc::vec::Vec;

use crate::sentence::TaggedSentence;
use crate::utils::Indexer;

/// Sentence-start sentinel of the transition table.
pub const BOS: &str = "<s>";

/// Sentence-end sentinel of the transition table.
pub const EOS: &str = "</s>";

/// Tags observed in the training corpus, numbered in order of first appearance.
///
/// The sentinels [`BOS`] and [`EOS`] are never members.
#[derive(Clone, Debug, Default)]
pub struct TagSet {
    tags: Indexer<String>,
}

impl TagSet {
    pub fn from_sentences(sentences: &[TaggedSentence]) -> Self {
        let mut tags = Indexer::new();
        for sentence in sentences {
            for tag in sentence.tags() {
                tags.get_or_insert(tag);
            }
        }
        Self { tags }
    }

    #[inline]
    pub fn get(&self, tag: &str) -> Option<usize> {
        self.tags.get(tag)
    }

    /// Gets the tag symbol of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn tag(&self, id: usize) -> &str {
        self.tags.key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.len() == 0
    }
}

/// Distinct words of the preprocessed training corpus.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    words: Indexer<String>,
    unknown_marker: String,
    unknown: Option<usize>,
}

impl Vocabulary {
    pub fn from_sentences(sentences: &[TaggedSentence], unknown_marker: &str) -> Self {
        let mut words = Indexer::new();
        for sentence in sentences {
            for word in sentence.words() {
                words.get_or_insert(word);
            }
        }
        let unknown = words.get(unknown_marker);
        Self {
            words,
            unknown_marker: unknown_marker.into(),
            unknown,
        }
    }

    /// Gets the id of `word` without substitution.
    #[inline]
    pub fn get(&self, word: &str) -> Option<usize> {
        self.words.get(word)
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.get(word).is_some()
    }

    /// Gets the id of `word`, substituting the unknown-word marker for words outside the
    /// vocabulary. Returns [`None`] only if the marker itself was never observed.
    #[inline]
    pub fn resolve(&self, word: &str) -> Option<usize> {
        self.words.get(word).or(self.unknown)
    }

    /// Gets the word of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn word(&self, id: usize) -> &str {
        self.words.key(id)
    }

    #[inline]
    pub fn unknown_marker(&self) -> &str {
        &self.unknown_marker
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.len() == 0
    }
}

/// Probability that a sentence begins with each tag, indexed by tag id.
#[derive(Clone, Debug, Default)]
pub struct StartDistribution {
    pub(crate) probs: Vec<f64>,
}

impl StartDistribution {
    #[inline]
    pub fn get(&self, tag: usize) -> f64 {
        self.probs.get(tag).copied().unwrap_or(0.0)
    }
}

// Transition probabilities are stored in a dense square array with `n_tags + 1` rows and
// columns. The extra row holds transitions from `<s>`, and the extra column holds transitions
// into `</s>`:
//
//          tag0  tag1  ...  </s>
//
// tag0       0     1          n
// tag1     n+1   n+2         2n+1
// ...
// <s>      ...
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    pub(crate) n_tags: usize,
    pub(crate) probs: Vec<f64>,
}

impl TransitionTable {
    /// Row index of the `<s>` sentinel.
    #[inline]
    pub const fn bos(&self) -> usize {
        self.n_tags
    }

    /// Column index of the `</s>` sentinel.
    #[inline]
    pub const fn eos(&self) -> usize {
        self.n_tags
    }

    /// Gets P(`next` | `prev`). Out-of-range ids yield 0.
    #[inline]
    pub fn get(&self, prev: usize, next: usize) -> f64 {
        if prev > self.n_tags || next > self.n_tags {
            return 0.0;
        }
        self.probs
            .get(prev * (self.n_tags + 1) + next)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Emission probabilities in a dense `n_tags` x `n_words` array.
#[derive(Clone, Debug, Default)]
pub struct EmissionTable {
    pub(crate) n_words: usize,
    pub(crate) probs: Vec<f64>,
}

impl EmissionTable {
    /// Gets P(`word` | `tag`). Out-of-range ids yield 0.
    #[inline]
    pub fn get(&self, tag: usize, word: usize) -> f64 {
        if word >= self.n_words {
            return 0.0;
        }
        self.probs
            .get(tag * self.n_words + word)
            .copied()
            .unwrap_or(0.0)
    }
}

/// First-order HMM estimated from a tagged corpus.
///
/// A model is immutable once built, so any number of decoders may read it at the same time.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub(crate) tags: TagSet,
    pub(crate) vocabulary: Vocabulary,
    pub(crate) start: StartDistribution,
    pub(crate) transitions: TransitionTable,
    pub(crate) emissions: EmissionTable,
}

impl Model {
    #[inline]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn start_distribution(&self) -> &StartDistribution {
        &self.start
    }

    #[inline]
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    #[inline]
    pub fn emissions(&self) -> &EmissionTable {
        &self.emissions
    }

    /// Gets the probability that a sentence begins with `tag`.
    pub fn start_prob(&self, tag: &str) -> f64 {
        self.tags.get(tag).map_or(0.0, |tag| self.start.get(tag))
    }

    /// Gets the smoothed probability of `next` following `prev`.
    ///
    /// `prev` may be [`BOS`] and `next` may be [`EOS`]. Unknown tags yield 0.
    pub fn transition_prob(&self, prev: &str, next: &str) -> f64 {
        let prev = if prev == BOS {
            Some(self.transitions.bos())
        } else {
            self.tags.get(prev)
        };
        let next = if next == EOS {
            Some(self.transitions.eos())
        } else {
            self.tags.get(next)
        };
        match (prev, next) {
            (Some(prev), Some(next)) => self.transitions.get(prev, next),
            _ => 0.0,
        }
    }

    /// Gets the smoothed probability of `tag` emitting `word`.
    ///
    /// `word` is looked up as is; words outside the vocabulary yield 0.
    pub fn emission_prob(&self, tag: &str, word: &str) -> f64 {
        match (self.tags.get(tag), self.vocabulary.get(word)) {
            (Some(tag), Some(word)) => self.emissions.get(tag, word),
            _ => 0.0,
        }
    }
}
