/// Split text into words on ASCII spaces. Runs of spaces never produce empty words.
///
/// Only the space character separates words: every other character below it is a
/// control character and makes the surrounding word (or document) invalid instead.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|word| !word.is_empty())
}

/// A word, or a whole text, is valid when it carries no control characters.
pub fn is_valid_word(text: &str) -> bool {
    !text.chars().any(|c| c < ' ')
}
