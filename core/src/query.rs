use crate::error::{Result, SearchError};
use crate::stop_words::StopWords;
use crate::tokenizer::{is_valid_word, tokenize};
use std::collections::BTreeSet;

/// A parsed query. Words borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'a> {
    /// Words whose documents are scored.
    pub plus_words: BTreeSet<&'a str>,
    /// Words whose documents are excluded outright.
    pub minus_words: BTreeSet<&'a str>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'a>(text: &'a str, stop_words: &StopWords) -> Result<QueryWord<'a>> {
    if text.is_empty() {
        return Err(SearchError::InvalidQuery("query word is empty".into()));
    }
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
        return Err(SearchError::InvalidQuery(format!("query word {text:?} is invalid")));
    }
    Ok(QueryWord { data, is_minus, is_stop: stop_words.contains(data) })
}

impl<'a> Query<'a> {
    pub fn parse(raw_query: &'a str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for word in tokenize(raw_query) {
            let word = parse_query_word(word, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.insert(word.data);
            } else {
                query.plus_words.insert(word.data);
            }
        }
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop() -> StopWords {
        StopWords::from_text("and in on").unwrap()
    }

    #[test]
    fn splits_plus_and_minus_words() {
        let query = Query::parse("fluffy -collar cat and cat -collar", &stop()).unwrap();
        assert_eq!(query.plus_words.into_iter().collect::<Vec<_>>(), vec!["cat", "fluffy"]);
        assert_eq!(query.minus_words.into_iter().collect::<Vec<_>>(), vec!["collar"]);
    }

    #[test]
    fn stop_words_dropped_even_as_minus_words() {
        let query = Query::parse("-in on cat", &stop()).unwrap();
        assert!(query.minus_words.is_empty());
        assert_eq!(query.plus_words.len(), 1);
    }

    #[test]
    fn rejects_malformed_words() {
        for raw in ["cat -", "--cat", "cat -\u{12}dog", "c\u{3}at"] {
            let err = Query::parse(raw, &stop()).unwrap_err();
            assert!(matches!(err, SearchError::InvalidQuery(_)), "{raw:?} gave {err:?}");
        }
    }

    #[test]
    fn inner_dash_is_fine() {
        let query = Query::parse("well-known -semi-final", &stop()).unwrap();
        assert!(query.plus_words.contains("well-known"));
        assert!(query.minus_words.contains("semi-final"));
    }

    #[test]
    fn blank_query_is_empty() {
        assert!(Query::parse("   ", &stop()).unwrap().is_empty());
    }
}
