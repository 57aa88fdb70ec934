use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::errors::{Result, TaggerError};

/// A word paired with its tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaggedToken {
    pub(crate) word: String,
    pub(crate) tag: String,
}

impl TaggedToken {
    /// Creates a new token.
    pub fn new<W, T>(word: W, tag: T) -> Self
    where
        W: Into<String>,
        T: Into<String>,
    {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }

    /// Gets the surface string of the token.
    #[inline]
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Gets the tag of the token.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl<W, T> From<(W, T)> for TaggedToken
where
    W: Into<String>,
    T: Into<String>,
{
    fn from((word, tag): (W, T)) -> Self {
        Self::new(word, tag)
    }
}

/// Sentence with tag annotations. Token order is the left-to-right word order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaggedSentence {
    pub(crate) tokens: Vec<TaggedToken>,
}

impl TaggedSentence {
    /// Creates a new [`TaggedSentence`] from tokens.
    pub fn new(tokens: Vec<TaggedToken>) -> Self {
        Self { tokens }
    }

    /// Creates a new [`TaggedSentence`] from a tagged string.
    ///
    /// Tokens are separated by whitespace, and each token is split into a word and a tag at the
    /// last occurrence of `delimiter`, so words may contain the delimiter themselves.
    ///
    /// # Arguments
    ///
    /// * `text` - A string of tagged tokens such as `The/DT dog/NN`.
    /// * `delimiter` - A character separating a word from its tag.
    ///
    /// # Errors
    ///
    /// If a token lacks the delimiter, or its word or tag is empty, an error variant will be
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use hmm_tagger::TaggedSentence;
    ///
    /// let s = TaggedSentence::from_tagged("1/2/CD inch/NN", '/').unwrap();
    /// assert_eq!("1/2", s.tokens()[0].word());
    /// assert_eq!("CD", s.tokens()[0].tag());
    ///
    /// assert!(TaggedSentence::from_tagged("dog", '/').is_err());
    /// ```
    pub fn from_tagged<S>(text: S, delimiter: char) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let mut tokens = vec![];
        for token in text.as_ref().split_whitespace() {
            let (word, tag) = token.rsplit_once(delimiter).ok_or_else(|| {
                TaggerError::invalid_argument(
                    "text",
                    format!("token `{token}` does not contain `{delimiter}`"),
                )
            })?;
            if word.is_empty() {
                return Err(TaggerError::invalid_argument(
                    "text",
                    format!("token `{token}` has an empty word"),
                ));
            }
            if tag.is_empty() {
                return Err(TaggerError::invalid_argument(
                    "text",
                    format!("token `{token}` has an empty tag"),
                ));
            }
            tokens.push(TaggedToken::new(word, tag));
        }
        Ok(Self { tokens })
    }

    /// Renders the sentence as whitespace-separated `word<delimiter>tag` tokens.
    pub fn to_tagged_string(&self, delimiter: char) -> String {
        let mut result = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i != 0 {
                result.push(' ');
            }
            result.push_str(&token.word);
            result.push(delimiter);
            result.push_str(&token.tag);
        }
        result
    }

    #[inline]
    pub fn tokens(&self) -> &[TaggedToken] {
        &self.tokens
    }

    #[inline]
    pub fn iter_tokens(&self) -> core::slice::Iter<'_, TaggedToken> {
        self.tokens.iter()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(TaggedToken::word)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(TaggedToken::tag)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<T> FromIterator<T> for TaggedSentence
where
    T: Into<TaggedToken>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for TaggedSentence {
    type Item = TaggedToken;
    type IntoIter = vec::IntoIter<TaggedToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::string::ToString;

    #[test]
    fn test_from_tagged_empty() {
        let s = TaggedSentence::from_tagged("", '/').unwrap();

        assert!(s.is_empty());
    }

    #[test]
    fn test_from_tagged() {
        let s = TaggedSentence::from_tagged("The/DT  dog/NN\tbarks/VBZ ./.", '/').unwrap();

        let expected = TaggedSentence::new(vec![
            TaggedToken::new("The", "DT"),
            TaggedToken::new("dog", "NN"),
            TaggedToken::new("barks", "VBZ"),
            TaggedToken::new(".", "."),
        ]);
        assert_eq!(expected, s);
    }

    #[test]
    fn test_from_tagged_last_delimiter() {
        let s = TaggedSentence::from_tagged("3/4/CD and/CC //SYM", '/').unwrap();

        assert_eq!(vec!["3/4", "and", "/"], s.words().collect::<Vec<_>>());
        assert_eq!(vec!["CD", "CC", "SYM"], s.tags().collect::<Vec<_>>());
    }

    #[test]
    fn test_from_tagged_other_delimiter() {
        let s = TaggedSentence::from_tagged("a_DT cat_NN", '_').unwrap();

        assert_eq!("a_DT cat_NN", s.to_tagged_string('_'));
    }

    #[test]
    fn test_from_tagged_no_delimiter() {
        let s = TaggedSentence::from_tagged("The/DT dog", '/');

        assert_eq!(
            "InvalidArgumentError: text: token `dog` does not contain `/`",
            &s.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_from_tagged_empty_tag() {
        let s = TaggedSentence::from_tagged("dog/", '/');

        assert_eq!(
            "InvalidArgumentError: text: token `dog/` has an empty tag",
            &s.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_from_tagged_empty_word() {
        let s = TaggedSentence::from_tagged("/NN", '/');

        assert!(s.is_err());
    }

    #[test]
    fn test_to_tagged_string() {
        let s: TaggedSentence = [("the", "DET"), ("dog", "NOUN")].into_iter().collect();

        assert_eq!("the/DET dog/NOUN", s.to_tagged_string('/'));
    }
}
