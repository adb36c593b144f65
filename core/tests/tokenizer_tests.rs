use search_core::tokenizer::{is_valid_word, tokenize};
use search_core::{SearchError, StopWords};

#[test]
fn it_splits_on_spaces_only() {
    let words: Vec<&str> = tokenize("Running  runner's RUN! café-menu").collect();
    assert_eq!(words, vec!["Running", "runner's", "RUN!", "café-menu"]);
    // no case folding or stemming: words are indexed as written
    assert!(!words.contains(&"run"));
}

#[test]
fn it_filters_stopwords() {
    let stop = StopWords::from_text("the and").unwrap();
    let words: Vec<&str> = stop.filter("The quick brown fox and the lazy dog").collect();
    assert_eq!(words, vec!["The", "quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_rejects_control_characters_in_stopwords() {
    assert!(is_valid_word("ordinary"));
    assert!(matches!(StopWords::new(["ok", "bad\r"]), Err(SearchError::InvalidStopWord(_))));
}
