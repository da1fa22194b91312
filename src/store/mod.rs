//! Document store sinks.
//!
//! A sink stores one document at a time under a named collection. The batch
//! driver checks connectivity once with [`DocumentSink::ping`] before any
//! record is generated.

mod jsonl;
mod memory;

pub use jsonl::{CollectionWriter, JsonlStore, FLUSH_EVERY_DOCS, WRITER_BUFFER_SIZE};
pub use memory::MemoryStore;

use record_gen::Record;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a document sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("document store unreachable at {}: {reason}", path.display())]
    Unreachable { path: PathBuf, reason: String },

    #[error("unsupported store location '{0}' (expected a directory path or file:// URI)")]
    UnsupportedScheme(String),

    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    #[error("I/O error on collection '{collection}': {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode document for '{collection}': {source}")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Destination for generated documents
pub trait DocumentSink {
    /// Check that the store is reachable
    fn ping(&mut self) -> Result<(), SinkError>;

    /// Durably store one document under `collection`
    fn insert_one(&mut self, collection: &str, document: &Record) -> Result<(), SinkError>;

    /// Flush any buffered documents
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// Reject names that would escape the store directory
pub(crate) fn check_name(kind: &'static str, name: &str) -> Result<(), SinkError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(SinkError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}
