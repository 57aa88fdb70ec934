#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]

//! # hmm_tagger
//!
//! A part-of-speech tagger based on a first-order hidden Markov model.
//!
//! The start, transition, and emission distributions are estimated from a tagged corpus with
//! add-one smoothing, and the most probable tag sequence of a sentence is found with the
//! Viterbi algorithm.
//!
//! ## Examples
//!
//! ```
//! use hmm_tagger::{Decoder, Preprocessor, TaggedSentence, Trainer};
//!
//! let corpus = [
//!     "The/DT dog/NN barks/VBZ ./.",
//!     "The/DT cat/NN sleeps/VBZ ./.",
//!     "A/DT dog/NN sleeps/VBZ ./.",
//! ];
//!
//! let mut trainer = Trainer::new(Preprocessor::default());
//! for line in corpus {
//!     trainer.push_sentence(TaggedSentence::from_tagged(line, '/').unwrap());
//! }
//! let model = trainer.train();
//!
//! let decoder = Decoder::new(&model);
//! let prediction = decoder.decode(&["The", "bird", "sleeps", "."]);
//! assert_eq!(&["DT", "NN", "VBZ", "."], prediction.tags());
//! ```

extern crate alloc;

mod decoder;
mod model;
mod preprocess;
mod sentence;
mod trainer;
mod utils;

pub mod errors;

pub use decoder::{Cell, Column, Decoder, Prediction, Steps};
pub use model::{
    EmissionTable, Model, StartDistribution, TagSet, TransitionTable, Vocabulary, BOS, EOS,
};
pub use preprocess::{Preprocessor, DEFAULT_PLACEHOLDER_TAG, DEFAULT_UNKNOWN_MARKER};
pub use sentence::{TaggedSentence, TaggedToken};
pub use trainer::{
    estimate, estimate_emissions, estimate_start_distribution, estimate_transitions, Trainer,
};
