use alloc::vec;
use alloc::vec::Vec;

use crate::model::Model;

/// Most probable tag sequence of a sentence.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction<'a> {
    tags: Vec<&'a str>,
    probability: f64,
}

impl<'a> Prediction<'a> {
    const fn empty() -> Self {
        Self {
            tags: Vec::new(),
            probability: 0.0,
        }
    }

    /// Gets the predicted tags, one per input token. Empty if no path survived.
    #[inline]
    pub fn tags(&self) -> &[&'a str] {
        &self.tags
    }

    /// Gets the joint probability of the path and the input tokens.
    #[inline]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn into_tags(self) -> Vec<&'a str> {
        self.tags
    }
}

#[derive(Clone, Debug)]
struct Entry {
    tag: usize,
    probability: f64,
    predecessor: Option<usize>,
    path: Vec<usize>,
}

/// Viterbi decoder.
///
/// The decoder only borrows the model, and each call keeps its own lattice, so a model can be
/// shared by any number of decoders.
///
/// Probabilities are multiplied as plain `f64` values and a state survives only while its score
/// is strictly positive. Long sentences may therefore underflow to an empty prediction.
///
/// # Examples
///
/// ```
/// use hmm_tagger::{Decoder, Preprocessor, Trainer};
///
/// let mut trainer = Trainer::new(Preprocessor::default());
/// trainer.push_sentence([("the", "DET"), ("dog", "NOUN")]);
/// trainer.push_sentence([("a", "DET"), ("cat", "NOUN")]);
/// let model = trainer.train();
///
/// let decoder = Decoder::new(&model);
/// let prediction = decoder.decode(&["the", "cat"]);
/// assert_eq!(&["DET", "NOUN"], prediction.tags());
/// assert!(prediction.probability() > 0.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    model: &'a Model,
}

impl<'a> Decoder<'a> {
    pub const fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Finds the most probable tag sequence of `tokens`.
    ///
    /// Words outside the vocabulary are looked up as the unknown-word marker. An empty input, or
    /// an input for which every path has probability 0, yields an empty prediction with
    /// probability 0.
    pub fn decode<S>(&self, tokens: &[S]) -> Prediction<'a>
    where
        S: AsRef<str>,
    {
        let mut column = vec![];
        for (i, token) in tokens.iter().enumerate() {
            let word = self.model.vocabulary.resolve(token.as_ref());
            column = if i == 0 {
                self.initial_column(word)
            } else {
                self.next_column(&column, word)
            };
        }
        self.best(&column)
    }

    /// Returns an iterator yielding a snapshot of the lattice after each token.
    ///
    /// Columns are computed lazily while iterating. Call [`Steps::finish`] to obtain the
    /// prediction.
    pub fn steps<I>(&self, tokens: I) -> Steps<'a, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Steps {
            decoder: *self,
            tokens: tokens.into_iter(),
            column: vec![],
            position: 0,
        }
    }

    fn initial_column(&self, word: Option<usize>) -> Vec<Entry> {
        let Some(word) = word else {
            return vec![];
        };
        let mut column = vec![];
        for tag in 0..self.model.tags.len() {
            let score = self.model.start.get(tag) * self.model.emissions.get(tag, word);
            if score > 0.0 {
                column.push(Entry {
                    tag,
                    probability: score,
                    predecessor: None,
                    path: vec![tag],
                });
            }
        }
        column
    }

    fn next_column(&self, prev_column: &[Entry], word: Option<usize>) -> Vec<Entry> {
        let Some(word) = word else {
            return vec![];
        };
        let mut column = vec![];
        for tag in 0..self.model.tags.len() {
            let emission = self.model.emissions.get(tag, word);
            if emission <= 0.0 {
                continue;
            }
            // Only states that survived the previous step can be predecessors. Ties keep the
            // earliest (lowest tag id) predecessor.
            let mut best: Option<(f64, &Entry)> = None;
            for prev in prev_column {
                let score =
                    prev.probability * self.model.transitions.get(prev.tag, tag) * emission;
                if best.map_or(true, |(best_score, _)| score > best_score) {
                    best = Some((score, prev));
                }
            }
            if let Some((score, prev)) = best {
                if score > 0.0 {
                    let mut path = Vec::with_capacity(prev.path.len() + 1);
                    path.extend_from_slice(&prev.path);
                    path.push(tag);
                    column.push(Entry {
                        tag,
                        probability: score,
                        predecessor: Some(prev.tag),
                        path,
                    });
                }
            }
        }
        column
    }

    fn best(&self, column: &[Entry]) -> Prediction<'a> {
        let model = self.model;
        best_entry(column).map_or_else(Prediction::empty, |entry| Prediction {
            tags: entry.path.iter().map(|&tag| model.tags.tag(tag)).collect(),
            probability: entry.probability,
        })
    }
}

fn best_entry(column: &[Entry]) -> Option<&Entry> {
    let mut best: Option<&Entry> = None;
    for entry in column {
        if best.map_or(true, |b| entry.probability > b.probability) {
            best = Some(entry);
        }
    }
    best
}

/// A surviving state in a [`Column`].
#[derive(Clone, Debug, PartialEq)]
pub struct Cell<'a> {
    tag: &'a str,
    probability: f64,
    predecessor: Option<&'a str>,
}

impl<'a> Cell<'a> {
    #[inline]
    pub const fn tag(&self) -> &'a str {
        self.tag
    }

    /// Gets the best cumulative probability of a path ending in this state.
    #[inline]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// Gets the tag of the best predecessor state, or [`None`] for the first column.
    #[inline]
    pub const fn predecessor(&self) -> Option<&'a str> {
        self.predecessor
    }
}

/// Read-only snapshot of one lattice column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column<'a> {
    position: usize,
    word: Option<&'a str>,
    cells: Vec<Cell<'a>>,
}

impl<'a> Column<'a> {
    /// Gets the index of the token this column was computed for.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Gets the vocabulary entry the token was looked up as. This is the unknown-word marker for
    /// words outside the vocabulary, and [`None`] if the marker is not in the vocabulary either.
    #[inline]
    pub const fn word(&self) -> Option<&'a str> {
        self.word
    }

    /// Gets the surviving states ordered by tag id.
    #[inline]
    pub fn cells(&self) -> &[Cell<'a>] {
        &self.cells
    }

    /// Gets the cell with the highest probability, preferring the lowest tag id on ties.
    pub fn best(&self) -> Option<&Cell<'a>> {
        let mut best: Option<&Cell<'a>> = None;
        for cell in &self.cells {
            if best.map_or(true, |b| cell.probability > b.probability) {
                best = Some(cell);
            }
        }
        best
    }
}

/// Iterator over lattice snapshots created by [`Decoder::steps`].
pub struct Steps<'a, I> {
    decoder: Decoder<'a>,
    tokens: I,
    column: Vec<Entry>,
    position: usize,
}

impl<'a, I> Steps<'a, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Consumes the remaining tokens and returns the prediction.
    pub fn finish(mut self) -> Prediction<'a> {
        for _ in self.by_ref() {}
        self.decoder.best(&self.column)
    }
}

impl<'a, I> Iterator for Steps<'a, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Column<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.next()?;
        let model = self.decoder.model;
        let word = model.vocabulary.resolve(token.as_ref());
        self.column = if self.position == 0 {
            self.decoder.initial_column(word)
        } else {
            self.decoder.next_column(&self.column, word)
        };
        let snapshot = Column {
            position: self.position,
            word: word.map(|word| model.vocabulary.word(word)),
            cells: self
                .column
                .iter()
                .map(|entry| Cell {
                    tag: model.tags.tag(entry.tag),
                    probability: entry.probability,
                    predecessor: entry.predecessor.map(|tag| model.tags.tag(tag)),
                })
                .collect(),
        };
        self.position += 1;
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::preprocess::Preprocessor;
    use crate::trainer::Trainer;

    fn train(corpus: &[&[(&str, &str)]]) -> Model {
        let mut trainer = Trainer::new(Preprocessor::default());
        for &sentence in corpus {
            trainer.push_sentence(sentence.iter().copied());
        }
        trainer.train()
    }

    fn det_noun_model() -> Model {
        train(&[
            &[("the", "DET"), ("dog", "NOUN")],
            &[("a", "DET"), ("cat", "NOUN")],
        ])
    }

    #[test]
    fn test_decode_det_noun() {
        let model = det_noun_model();
        let decoder = Decoder::new(&model);

        let prediction = decoder.decode(&["the", "cat"]);

        assert_eq!(&["DET", "NOUN"], prediction.tags());
        // Every word is <UNK>, V = 1, K = 3: 1.0 * 1.0 * (3 / 5) * 1.0
        assert!((prediction.probability() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_decode_empty_input() {
        let model = det_noun_model();
        let decoder = Decoder::new(&model);

        let prediction = decoder.decode::<&str>(&[]);

        assert!(prediction.is_empty());
        assert_eq!(0.0, prediction.probability());
    }

    #[test]
    fn test_decode_empty_model() {
        let model = train(&[]);
        let decoder = Decoder::new(&model);

        let prediction = decoder.decode(&["the", "cat"]);

        assert_eq!(Prediction::empty(), prediction);
    }

    #[test]
    fn test_decode_empty_sentences_only() {
        let model = train(&[&[], &[("x", "-NONE-")]]);
        let decoder = Decoder::new(&model);

        assert!(decoder.decode(&["x"]).is_empty());
    }

    #[test]
    fn test_decode_without_unknown_marker() {
        // No rare words, so the vocabulary has no <UNK> entry.
        let model = train(&[
            &[("the", "DET"), ("dog", "NOUN")],
            &[("the", "DET"), ("dog", "NOUN")],
        ]);
        let decoder = Decoder::new(&model);

        assert_eq!(&["DET", "NOUN"], decoder.decode(&["the", "dog"]).tags());
        assert!(decoder.decode(&["the", "cat"]).is_empty());
        assert!(decoder.decode(&["cat"]).is_empty());
    }

    #[test]
    fn test_decode_unseen_word_uses_unknown_row() {
        let model = train(&[
            &[("the", "DT"), ("zebra", "NN"), ("runs", "VBZ")],
            &[("the", "DT"), ("dog", "NN"), ("runs", "VBZ")],
            &[("the", "DT"), ("dog", "NN")],
        ]);
        let decoder = Decoder::new(&model);

        assert!(!model.vocabulary().contains("zebra"));
        assert!(model.emission_prob("NN", "<UNK>") > 0.0);
        let unseen = decoder.decode(&["the", "quagga", "runs"]);
        let marker = decoder.decode(&["the", "<UNK>", "runs"]);
        assert_eq!(&["DT", "NN", "VBZ"], unseen.tags());
        assert_eq!(marker, unseen);
        // The rare training word itself is also outside the vocabulary.
        assert_eq!(marker, decoder.decode(&["the", "zebra", "runs"]));
    }

    #[test]
    fn test_decode_prefers_likely_path() {
        let model = train(&[
            &[("they", "PRP"), ("can", "MD"), ("fish", "VB")],
            &[("they", "PRP"), ("can", "MD"), ("fish", "VB")],
            &[("they", "PRP"), ("fish", "VBP")],
            &[("fish", "NN"), ("swim", "VBP")],
            &[("fish", "NN"), ("swim", "VBP")],
        ]);
        let decoder = Decoder::new(&model);

        assert_eq!(&["PRP", "MD", "VB"], decoder.decode(&["they", "can", "fish"]).tags());
        assert_eq!(&["NN", "VBP"], decoder.decode(&["fish", "swim"]).tags());
    }

    fn tie_model(first: &str, second: &str) -> Model {
        // Two symmetric sentence-initial tags lead to the same tag with equal scores.
        train(&[
            &[("x", first), ("y", "C")],
            &[("x", second), ("y", "C")],
            &[("x", first), ("y", "C")],
            &[("x", second), ("y", "C")],
        ])
    }

    #[test]
    fn test_tie_break_prefers_first_tag() {
        let model = tie_model("A", "B");
        let decoder = Decoder::new(&model);

        let first = decoder.decode(&["x", "y"]);
        let second = decoder.decode(&["x", "y"]);

        assert_eq!(&["A", "C"], first.tags());
        assert_eq!(first, second);

        let model = tie_model("B", "A");
        let decoder = Decoder::new(&model);

        assert_eq!(&["B", "C"], decoder.decode(&["x", "y"]).tags());
    }

    #[test]
    fn test_steps() {
        let model = det_noun_model();
        let decoder = Decoder::new(&model);

        let mut steps = decoder.steps(["the", "cat"]);

        let column = steps.next().unwrap();
        assert_eq!(0, column.position());
        assert_eq!(Some("<UNK>"), column.word());
        assert_eq!(1, column.cells().len());
        assert_eq!("DET", column.cells()[0].tag());
        assert_eq!(None, column.cells()[0].predecessor());

        let column = steps.next().unwrap();
        assert_eq!(1, column.position());
        assert_eq!(2, column.cells().len());
        let best = column.best().unwrap();
        assert_eq!("NOUN", best.tag());
        assert_eq!(Some("DET"), best.predecessor());

        assert!(steps.next().is_none());
        assert_eq!(decoder.decode(&["the", "cat"]), steps.finish());
    }

    #[test]
    fn test_steps_finish_without_iteration() {
        let model = det_noun_model();
        let decoder = Decoder::new(&model);

        let steps = decoder.steps(vec!["a", "dog"]);

        assert_eq!(decoder.decode(&["a", "dog"]), steps.finish());
    }

    #[test]
    fn test_steps_after_collapse() {
        let model = train(&[
            &[("the", "DET"), ("dog", "NOUN")],
            &[("the", "DET"), ("dog", "NOUN")],
        ]);
        let decoder = Decoder::new(&model);

        let columns: Vec<_> = decoder.steps(["the", "cat", "dog"]).collect();

        assert_eq!(3, columns.len());
        assert_eq!(None, columns[1].word());
        assert!(columns[1].cells().is_empty());
        assert!(columns[2].cells().is_empty());
        assert!(decoder.steps(["the", "cat", "dog"]).finish().is_empty());
    }
}
