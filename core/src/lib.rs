pub mod accumulator;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod process_queries;
pub mod query;
pub mod ranking;
pub mod request_queue;
pub mod server;
pub mod stop_words;
pub mod tokenizer;

pub use accumulator::ShardedAccumulator;
pub use config::{ExecutionPolicy, SearchServerConfig, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
pub use dedup::remove_duplicates;
pub use document::{DocId, Document, DocumentRecord, DocumentStatus};
pub use error::{Result, SearchError};
pub use index::InvertedIndex;
pub use process_queries::{process_queries, process_queries_joined};
pub use query::Query;
pub use request_queue::{RequestQueue, REQUEST_WINDOW};
pub use server::SearchServer;
pub use stop_words::StopWords;
