//! TF-IDF relevance over an [`InvertedIndex`], sequential and parallel.
//!
//! Both paths produce the same candidate set; [`top_documents`] then orders it on the
//! calling thread, so the final ranking never depends on worker scheduling.

use crate::accumulator::ShardedAccumulator;
use crate::config::{MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
use crate::document::{DocId, Document, DocumentStatus};
use crate::index::InvertedIndex;
use crate::query::Query;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Score every document reachable from the query's plus-words and accepted by
/// `predicate`, then drop every document containing a minus-word.
pub fn find_all_documents<P>(index: &InvertedIndex, query: &Query<'_>, predicate: &P) -> Vec<Document>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool,
{
    let mut document_to_relevance: BTreeMap<DocId, f64> = BTreeMap::new();
    for &word in &query.plus_words {
        let (Some(postings), Some(idf)) = (index.postings(word), index.inverse_document_freq(word)) else {
            continue;
        };
        for (&id, &tf) in postings {
            if let Some(doc) = index.document(id) {
                if predicate(id, doc.status, doc.rating) {
                    *document_to_relevance.entry(id).or_insert(0.0) += tf * idf;
                }
            }
        }
    }

    for &word in &query.minus_words {
        if let Some(postings) = index.postings(word) {
            for id in postings.keys() {
                document_to_relevance.remove(id);
            }
        }
    }

    collect_documents(index, document_to_relevance)
}

/// Parallel form of [`find_all_documents`]: one task per query word, relevance summed
/// in a [`ShardedAccumulator`] with `shard_count` shards. Runs on the current rayon pool.
pub fn find_all_documents_parallel<P>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
    shard_count: usize,
) -> Vec<Document>
where
    P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
{
    let document_to_relevance: ShardedAccumulator<DocId, f64> = ShardedAccumulator::new(shard_count);

    query.plus_words.par_iter().for_each(|&word| {
        let (Some(postings), Some(idf)) = (index.postings(word), index.inverse_document_freq(word)) else {
            return;
        };
        for (&id, &tf) in postings {
            if let Some(doc) = index.document(id) {
                if predicate(id, doc.status, doc.rating) {
                    *document_to_relevance.access(id) += tf * idf;
                }
            }
        }
    });

    // minus-words only start once every plus-word task has finished
    query.minus_words.par_iter().for_each(|&word| {
        if let Some(postings) = index.postings(word) {
            for &id in postings.keys() {
                document_to_relevance.erase(id);
            }
        }
    });

    collect_documents(index, document_to_relevance.drain())
}

fn collect_documents(index: &InvertedIndex, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
    relevance
        .into_iter()
        .filter_map(|(id, relevance)| index.document(id).map(|doc| Document::new(id, relevance, doc.rating)))
        .collect()
}

fn by_relevance(lhs: &Document, rhs: &Document) -> Ordering {
    rhs.relevance
        .total_cmp(&lhs.relevance)
        .then_with(|| rhs.rating.cmp(&lhs.rating))
        .then_with(|| lhs.id.cmp(&rhs.id))
}

// within a tie group relevances count as equal
fn by_rating(lhs: &Document, rhs: &Document) -> Ordering {
    rhs.rating.cmp(&lhs.rating).then_with(|| lhs.id.cmp(&rhs.id))
}

/// Order by descending relevance, keep the first [`MAX_RESULT_DOCUMENT_COUNT`].
///
/// Neighbours whose relevances differ by less than [`RELEVANCE_EPSILON`] form a tie
/// group, ordered by descending rating instead, then by ascending id.
pub fn top_documents(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(by_relevance);

    let mut start = 0;
    while start < documents.len() {
        let mut end = start + 1;
        while end < documents.len() && documents[end - 1].relevance - documents[end].relevance < RELEVANCE_EPSILON {
            end += 1;
        }
        if end - start > 1 {
            documents[start..end].sort_by(by_rating);
        }
        if end >= MAX_RESULT_DOCUMENT_COUNT {
            break;
        }
        start = end;
    }

    documents.truncate(MAX_RESULT_DOCUMENT_COUNT);
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentRecord;
    use crate::stop_words::StopWords;

    fn index() -> InvertedIndex {
        let mut index = InvertedIndex::new();
        let docs: [(DocId, &str, i32, DocumentStatus); 4] = [
            (0, "white cat fashionable collar", 8, DocumentStatus::Actual),
            (1, "fluffy cat fluffy tail", 7, DocumentStatus::Actual),
            (2, "groomed dog expressive eyes", 5, DocumentStatus::Actual),
            (3, "groomed starling eugene", 9, DocumentStatus::Banned),
        ];
        for (id, text, rating, status) in docs {
            let words: Vec<&str> = text.split(' ').collect();
            index.insert(id, &words, DocumentRecord { content: text.into(), rating, status });
        }
        index
    }

    fn actual(_: DocId, status: DocumentStatus, _: i32) -> bool {
        status == DocumentStatus::Actual
    }

    #[test]
    fn scores_by_tf_idf() {
        let index = index();
        let stop = StopWords::default();
        let query = Query::parse("fluffy groomed cat", &stop).unwrap();
        let found = top_documents(find_all_documents(&index, &query, &actual));
        let ids: Vec<DocId> = found.iter().map(|d| d.id).collect();
        // 0 and 2 tie on relevance, 0 has the higher rating
        assert_eq!(ids, vec![1, 0, 2]);

        let fluffy = 0.5 * 4.0f64.ln() + 0.25 * 2.0f64.ln();
        assert!((found[0].relevance - fluffy).abs() < 1e-12);
        assert_eq!(found[0].rating, 7);
    }

    #[test]
    fn minus_words_exclude_after_scoring() {
        let index = index();
        let stop = StopWords::default();
        let query = Query::parse("cat -tail", &stop).unwrap();
        let found = find_all_documents(&index, &query, &actual);
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn parallel_agrees_with_sequential() {
        let index = index();
        let stop = StopWords::default();
        for raw in ["fluffy groomed cat", "cat -collar", "eugene groomed", "nothing here", ""] {
            let query = Query::parse(raw, &stop).unwrap();
            let any = |_: DocId, _: DocumentStatus, _: i32| true;
            let seq = top_documents(find_all_documents(&index, &query, &any));
            let par = top_documents(find_all_documents_parallel(&index, &query, &any, 3));
            assert_eq!(seq.len(), par.len());
            for (s, p) in seq.iter().zip(&par) {
                assert_eq!((s.id, s.rating), (p.id, p.rating));
                assert!((s.relevance - p.relevance).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn near_equal_relevance_ordered_by_rating() {
        let docs = vec![
            Document::new(1, 0.5, 1),
            Document::new(2, 0.5 + 5e-7, 3),
            Document::new(3, 0.9, -10),
            Document::new(4, 0.5 - 4e-7, 9),
            Document::new(5, 0.1, 100),
        ];
        let ids: Vec<DocId> = top_documents(docs).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3, 4, 2, 1, 5]);
    }

    #[test]
    fn truncates_to_limit() {
        let docs = (0..20).map(|i| Document::new(i, f64::from(i), 0)).collect();
        let top = top_documents(docs);
        assert_eq!(top.len(), MAX_RESULT_DOCUMENT_COUNT);
        assert_eq!(top[0].id, 19);
        assert_eq!(top[4].id, 15);
    }
}
