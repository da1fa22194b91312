//! Directory-backed document store.
//!
//! Layout: `<root>/<database>/<collection>.jsonl`, one JSON document per
//! line. Files are opened in append mode, so repeated batches accumulate.

use super::{check_name, DocumentSink, SinkError};
use ahash::AHashMap;
use record_gen::Record;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Documents appended between forced flushes
pub const FLUSH_EVERY_DOCS: usize = 100;

const FILE_SCHEME: &str = "file://";

/// Append-only JSON-lines writer for one collection
pub struct CollectionWriter {
    collection: String,
    out: BufWriter<File>,
    unflushed: usize,
    appended: usize,
}

impl CollectionWriter {
    /// Open `path` for appending, creating it if needed
    pub fn open(collection: &str, path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SinkError::Io {
                collection: collection.to_string(),
                source,
            })?;

        Ok(Self {
            collection: collection.to_string(),
            out: BufWriter::with_capacity(WRITER_BUFFER_SIZE, file),
            unflushed: 0,
            appended: 0,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Documents appended through this writer
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Serialize `record` as one line at the end of the collection file
    pub fn append(&mut self, record: &Record) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, record).map_err(|e| self.encode_error(e))?;
        self.out.write_all(b"\n").map_err(|e| self.io_error(e))?;

        self.appended += 1;
        self.unflushed += 1;
        if self.unflushed >= FLUSH_EVERY_DOCS {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.unflushed = 0;
        self.out.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            collection: self.collection.clone(),
            source,
        }
    }

    fn encode_error(&self, source: serde_json::Error) -> SinkError {
        if source.is_io() {
            self.io_error(source.into())
        } else {
            SinkError::Encode {
                collection: self.collection.clone(),
                source,
            }
        }
    }
}

pub struct JsonlStore {
    root: PathBuf,
    database: String,
    writers: AHashMap<String, CollectionWriter>,
}

impl JsonlStore {
    pub fn new(root: PathBuf, database: impl Into<String>) -> Self {
        Self {
            root,
            database: database.into(),
            writers: AHashMap::new(),
        }
    }

    /// Open a store from a plain path or a `file://` URI
    pub fn from_uri(uri: &str, database: impl Into<String>) -> Result<Self, SinkError> {
        let path = if let Some(rest) = uri.strip_prefix(FILE_SCHEME) {
            rest
        } else if uri.contains("://") {
            return Err(SinkError::UnsupportedScheme(uri.to_string()));
        } else {
            uri
        };
        if path.is_empty() {
            return Err(SinkError::UnsupportedScheme(uri.to_string()));
        }
        Ok(Self::new(PathBuf::from(path), database))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn database_dir(&self) -> PathBuf {
        self.root.join(&self.database)
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.database_dir().join(format!("{}.jsonl", collection))
    }

    pub fn get_writer(&mut self, collection: &str) -> Result<&mut CollectionWriter, SinkError> {
        use std::collections::hash_map::Entry;

        match self.writers.entry(collection.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                check_name("collection", collection)?;
                let path = self
                    .root
                    .join(&self.database)
                    .join(format!("{}.jsonl", collection));
                let writer = CollectionWriter::open(collection, &path)?;
                tracing::debug!(collection, path = %path.display(), "opened collection");
                Ok(entry.insert(writer))
            }
        }
    }
}

impl DocumentSink for JsonlStore {
    fn ping(&mut self) -> Result<(), SinkError> {
        let unreachable = |reason: String| SinkError::Unreachable {
            path: self.root.clone(),
            reason,
        };

        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(unreachable("not a directory".to_string())),
            Err(e) => return Err(unreachable(e.to_string())),
        }

        check_name("database", &self.database)?;
        fs::create_dir_all(self.database_dir())
            .map_err(|e| unreachable(format!("cannot open database '{}': {}", self.database, e)))
    }

    fn insert_one(&mut self, collection: &str, document: &Record) -> Result<(), SinkError> {
        self.get_writer(collection)?.append(document)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writers.values_mut().try_for_each(CollectionWriter::flush)
    }
}

impl Drop for JsonlStore {
    fn drop(&mut self) {
        for writer in self.writers.values_mut() {
            if let Err(e) = writer.flush() {
                tracing::warn!(
                    collection = writer.collection(),
                    error = %e,
                    "failed to flush collection"
                );
            }
        }
    }
}
