//! In-memory TF-IDF search index with plus/minus-word queries.
//!
//! [`SearchIndex`] owns the forward and inverted indices and answers ranked
//! top-k queries; the remaining modules are helpers built on its public API.

mod concurrent_map;
pub mod document;
pub mod error;
pub mod index;
pub mod log_duration;
pub mod paginator;
pub mod process_queries;
pub mod query;
pub mod remove_duplicates;
pub mod request_queue;
pub mod search;
pub mod stop_words;
pub mod tokenizer;

pub use document::{Document, DocumentStatus};
pub use error::{Error, Result};
pub use index::{DocId, DocumentIds, ExecutionPolicy, SearchIndex, WordFrequencies};
pub use log_duration::LogDuration;
pub use paginator::{paginate, Page, Paginator};
pub use process_queries::{process_queries, process_queries_joined};
pub use remove_duplicates::remove_duplicates;
pub use request_queue::RequestQueue;
pub use search::{rank_documents, MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON};
pub use stop_words::StopWords;
