use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, tokenize};
use std::collections::BTreeSet;

/// Words excluded from both indexing and querying. Fixed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Empty strings are dropped and duplicates collapsed before validation.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(tokenize(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Words of `text` in order, stop words removed.
    pub fn filter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        tokenize(text).filter(move |word| !self.contains(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_empty_and_duplicates() {
        let stop = StopWords::new(["in", "", "the", "in"]).unwrap();
        assert_eq!(stop.len(), 2);
        assert_eq!(stop.iter().collect::<Vec<_>>(), vec!["in", "the"]);
    }

    #[test]
    fn rejects_control_characters() {
        let err = StopWords::new(["in", "th\u{1}e"]).unwrap_err();
        assert_eq!(err, SearchError::InvalidStopWord("th\u{1}e".into()));
    }

    #[test]
    fn filters_text() {
        let stop = StopWords::from_text("a in the with").unwrap();
        let words: Vec<&str> = stop.filter("old dog with a gold collar").collect();
        assert_eq!(words, vec!["old", "dog", "gold", "collar"]);
    }
}
