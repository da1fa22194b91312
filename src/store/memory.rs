//! In-memory document store, used for dry runs and tests.

use super::{check_name, DocumentSink, SinkError};
use record_gen::Record;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, Vec<Value>>,
    offline: bool,
    flushes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose connectivity check always fails
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn documents(&self, collection: &str) -> &[Value] {
        self.collections
            .get(collection)
            .map(|docs| docs.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, collection: &str) -> usize {
        self.documents(collection).len()
    }

    pub fn total(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.keys().map(String::as_str).collect()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl DocumentSink for MemoryStore {
    fn ping(&mut self) -> Result<(), SinkError> {
        if self.offline {
            return Err(SinkError::Unreachable {
                path: PathBuf::from("memory"),
                reason: "store is offline".to_string(),
            });
        }
        Ok(())
    }

    fn insert_one(&mut self, collection: &str, document: &Record) -> Result<(), SinkError> {
        check_name("collection", collection)?;
        let value = serde_json::to_value(document).map_err(|source| SinkError::Encode {
            collection: collection.to_string(),
            source,
        })?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}
