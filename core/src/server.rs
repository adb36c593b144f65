use crate::config::{ExecutionPolicy, SearchServerConfig};
use crate::document::{average_rating, DocId, Document, DocumentRecord, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::{DocumentIds, InvertedIndex, WordFreqs};
use crate::query::Query;
use crate::ranking;
use crate::stop_words::StopWords;
use crate::tokenizer::is_valid_word;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

/// In-memory full-text search over a document collection.
///
/// Documents enter through [`add_document`](Self::add_document) and leave through
/// [`remove_document`](Self::remove_document); queries are free text with `-word`
/// exclusions, ranked by TF-IDF. Operations with a parallel form take an
/// [`ExecutionPolicy`] and run it on the server's own worker pool.
#[derive(Debug)]
pub struct SearchServer {
    stop_words: StopWords,
    index: InvertedIndex,
    config: SearchServerConfig,
    pool: ThreadPool,
}

impl SearchServer {
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(stop_words, SearchServerConfig::default())
    }

    /// Stop words given as one space-separated string.
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Self::with_stop_words(StopWords::from_text(text)?, SearchServerConfig::default())
    }

    pub fn with_config<I, S>(stop_words: I, config: SearchServerConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_stop_words(StopWords::new(stop_words)?, config)
    }

    pub fn with_stop_words(stop_words: StopWords, config: SearchServerConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads())
            .thread_name(|i| format!("search-worker-{i}"))
            .build()
            .map_err(|e| SearchError::ThreadPool(e.to_string()))?;
        Ok(Self { stop_words, index: InvertedIndex::new(), config, pool })
    }

    pub fn add_document(&mut self, id: DocId, text: &str, status: DocumentStatus, ratings: &[i32]) -> Result<()> {
        if !is_valid_word(text) {
            return Err(SearchError::InvalidText(format!("document {id} contains control characters")));
        }
        if id < 0 {
            return Err(SearchError::InvalidId(id));
        }
        if self.index.contains(id) {
            return Err(SearchError::DuplicateId(id));
        }

        let words: Vec<&str> = self.stop_words.filter(text).collect();
        if words.is_empty() {
            return Err(SearchError::InvalidText(format!("document {id} has no words besides stop words")));
        }
        let record = DocumentRecord { content: text.to_owned(), rating: average_rating(ratings), status };
        self.index.insert(id, &words, record);
        debug!(id, words = words.len(), %status, "added document");
        Ok(())
    }

    pub fn remove_document(&mut self, id: DocId) -> Result<()> {
        self.remove_document_in(ExecutionPolicy::Sequential, id)
    }

    pub fn remove_document_in(&mut self, policy: ExecutionPolicy, id: DocId) -> Result<()> {
        let Self { index, pool, .. } = self;
        let removed = match policy {
            ExecutionPolicy::Sequential => index.remove(id),
            ExecutionPolicy::Parallel => pool.install(|| index.remove_parallel(id)),
        };
        removed.ok_or(SearchError::NotFound(id))?;
        debug!(id, ?policy, "removed document");
        Ok(())
    }

    /// Top documents with status ACTUAL.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(&self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.find_top_documents_with(raw_query, move |_, doc_status, _| doc_status == status)
    }

    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_in(ExecutionPolicy::Sequential, raw_query, predicate)
    }

    /// Rank documents accepted by `predicate(id, status, rating)` against `raw_query`.
    ///
    /// At most [`MAX_RESULT_DOCUMENT_COUNT`](crate::config::MAX_RESULT_DOCUMENT_COUNT)
    /// results, by descending relevance; relevances within
    /// [`RELEVANCE_EPSILON`](crate::config::RELEVANCE_EPSILON) of each other are ordered
    /// by descending rating. Both policies return the same documents in the same order.
    pub fn find_top_documents_in<P>(&self, policy: ExecutionPolicy, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        debug!(?policy, plus = query.plus_words.len(), minus = query.minus_words.len(), "ranking query");
        let matched = match policy {
            ExecutionPolicy::Sequential => ranking::find_all_documents(&self.index, &query, &predicate),
            ExecutionPolicy::Parallel => {
                let shards = self.config.accumulator_shards();
                self.pool.install(|| ranking::find_all_documents_parallel(&self.index, &query, &predicate, shards))
            }
        };
        Ok(ranking::top_documents(matched))
    }

    pub fn match_document(&self, raw_query: &str, id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        self.match_document_in(ExecutionPolicy::Sequential, raw_query, id)
    }

    /// Plus-words of the query present in the document, sorted and unique, with the
    /// document's status. Any minus-word present empties the word list.
    pub fn match_document_in(&self, policy: ExecutionPolicy, raw_query: &str, id: DocId) -> Result<(Vec<&str>, DocumentStatus)> {
        if id < 0 {
            return Err(SearchError::InvalidId(id));
        }
        let status = self.index.document(id).ok_or(SearchError::NotFound(id))?.status;
        let query = Query::parse(raw_query, &self.stop_words)?;
        let word_freqs = self.index.word_frequencies(id);

        let matched = match policy {
            ExecutionPolicy::Sequential => {
                if query.minus_words.iter().any(|w| word_freqs.contains_key(*w)) {
                    Vec::new()
                } else {
                    query.plus_words.iter().filter_map(|w| indexed_word(word_freqs, w)).collect()
                }
            }
            ExecutionPolicy::Parallel => self.pool.install(|| {
                if query.minus_words.par_iter().any(|w| word_freqs.contains_key(*w)) {
                    return Vec::new();
                }
                let mut matched: Vec<&str> = query.plus_words.par_iter().filter_map(|w| indexed_word(word_freqs, w)).collect();
                matched.par_sort_unstable();
                matched.dedup();
                matched
            }),
        };
        Ok((matched, status))
    }

    /// Word -> tf for a document; empty when the id is unknown.
    pub fn word_frequencies(&self, id: DocId) -> &WordFreqs {
        self.index.word_frequencies(id)
    }

    pub fn document(&self, id: DocId) -> Option<&DocumentRecord> {
        self.index.document(id)
    }

    pub fn document_count(&self) -> usize {
        self.index.len()
    }

    /// Live ids in ascending order.
    pub fn document_ids(&self) -> DocumentIds<'_> {
        self.index.ids()
    }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    pub fn config(&self) -> &SearchServerConfig { &self.config }

    pub(crate) fn pool(&self) -> &ThreadPool { &self.pool }
}

/// The index's own copy of `word`, so results outlive the query text.
fn indexed_word<'a>(word_freqs: &'a WordFreqs, word: &str) -> Option<&'a str> {
    word_freqs.get_key_value(word).map(|(w, _)| w.as_str())
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids()
    }
}
