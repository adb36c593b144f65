use crate::document::{DocId, DocumentRecord};
use rayon::prelude::*;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Term frequency per document, keyed by document.
pub type Postings = BTreeMap<DocId, f64>;
/// Term frequency per word, keyed by word.
pub type WordFreqs = BTreeMap<String, f64>;
pub type DocumentIds<'a> = std::iter::Copied<btree_map::Keys<'a, DocId, DocumentRecord>>;

static NO_WORDS: WordFreqs = BTreeMap::new();

/// Forward (word -> document -> tf) and inverse (document -> word -> tf) maps kept
/// as mirror images, plus the metadata of every live document.
///
/// `insert` and the `remove*` methods are the only writers; each leaves both maps in
/// agreement before returning. A word whose last document is removed disappears from
/// the forward map, so every listed word has at least one document.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    word_to_document_freqs: BTreeMap<String, Postings>,
    document_to_word_freqs: BTreeMap<DocId, WordFreqs>,
    documents: BTreeMap<DocId, DocumentRecord>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn contains(&self, id: DocId) -> bool { self.documents.contains_key(&id) }

    /// Live ids, ascending.
    pub fn ids(&self) -> DocumentIds<'_> {
        self.documents.keys().copied()
    }

    pub fn document(&self, id: DocId) -> Option<&DocumentRecord> {
        self.documents.get(&id)
    }

    /// Documents containing `word`, with the word's tf in each.
    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.word_to_document_freqs.get(word)
    }

    /// Words of a document with their tf; empty for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> &WordFreqs {
        self.document_to_word_freqs.get(&id).unwrap_or(&NO_WORDS)
    }

    /// Every indexed word with its postings, in word order.
    pub fn words(&self) -> impl Iterator<Item = (&str, &Postings)> {
        self.word_to_document_freqs.iter().map(|(word, postings)| (word.as_str(), postings))
    }

    /// `ln(live documents / documents containing word)`, or `None` for an unknown word.
    pub fn inverse_document_freq(&self, word: &str) -> Option<f64> {
        let postings = self.postings(word)?;
        Some((self.documents.len() as f64 / postings.len() as f64).ln())
    }

    /// Index a new document. `words` are its non-stop words in order, at least one;
    /// the caller has already checked that `id` is free.
    pub(crate) fn insert(&mut self, id: DocId, words: &[&str], record: DocumentRecord) {
        debug_assert!(!words.is_empty());
        debug_assert!(!self.contains(id));

        let inv_word_count = 1.0 / words.len() as f64;
        let mut freqs = WordFreqs::new();
        for &word in words {
            *freqs.entry(word.to_owned()).or_insert(0.0) += inv_word_count;
        }
        for (word, &tf) in &freqs {
            self.word_to_document_freqs.entry(word.clone()).or_default().insert(id, tf);
        }
        self.document_to_word_freqs.insert(id, freqs);
        self.documents.insert(id, record);
    }

    /// Drop a document from both maps and the metadata; `None` if it was not indexed.
    pub(crate) fn remove(&mut self, id: DocId) -> Option<DocumentRecord> {
        let record = self.documents.remove(&id)?;
        let freqs = self.document_to_word_freqs.remove(&id).unwrap_or_default();
        for word in freqs.keys() {
            if let Some(postings) = self.word_to_document_freqs.get_mut(word.as_str()) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.word_to_document_freqs.remove(word.as_str());
                }
            }
        }
        Some(record)
    }

    /// Same contract as [`remove`](Self::remove), with the per-word updates spread over
    /// the current rayon pool.
    ///
    /// The affected postings are detached from the forward map first, so every worker
    /// owns the entry it edits and the map's own structure is only touched from this
    /// thread.
    pub(crate) fn remove_parallel(&mut self, id: DocId) -> Option<DocumentRecord> {
        let record = self.documents.remove(&id)?;
        let freqs = self.document_to_word_freqs.remove(&id).unwrap_or_default();

        let mut detached: Vec<(String, Postings)> = freqs
            .keys()
            .filter_map(|word| self.word_to_document_freqs.remove_entry(word.as_str()))
            .collect();
        detached.par_iter_mut().for_each(|(_, postings)| {
            postings.remove(&id);
        });
        for (word, postings) in detached {
            if !postings.is_empty() {
                self.word_to_document_freqs.insert(word, postings);
            }
        }
        Some(record)
    }
}
