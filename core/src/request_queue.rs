use crate::document::{DocId, Document, DocumentStatus};
use crate::error::Result;
use crate::server::SearchServer;
use std::collections::VecDeque;

/// One day of requests at one per minute.
pub const REQUEST_WINDOW: usize = 1440;

struct QueryResult {
    documents: Vec<Document>,
}

/// Runs searches against a [`SearchServer`] and remembers the last
/// [`REQUEST_WINDOW`] results, counting how many of them found nothing.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<QueryResult>,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self { server, requests: VecDeque::with_capacity(REQUEST_WINDOW), no_result_requests: 0 }
    }

    /// A query the server rejects is returned as an error and not recorded.
    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let documents = self.server.find_top_documents_with(raw_query, predicate)?;
        if self.requests.len() >= REQUEST_WINDOW {
            if let Some(evicted) = self.requests.pop_back() {
                if evicted.documents.is_empty() {
                    self.no_result_requests -= 1;
                }
            }
        }
        if documents.is_empty() {
            self.no_result_requests += 1;
        }
        self.requests.push_front(QueryResult { documents: documents.clone() });
        Ok(documents)
    }

    pub fn add_find_request_by_status(&mut self, raw_query: &str, status: DocumentStatus) -> Result<Vec<Document>> {
        self.add_find_request_with(raw_query, move |_, doc_status, _| doc_status == status)
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    /// Empty results among the retained window.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    pub fn len(&self) -> usize { self.requests.len() }

    pub fn is_empty(&self) -> bool { self.requests.is_empty() }
}
