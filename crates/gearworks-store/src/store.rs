//! Document stores.
//!
//! [`DocumentStore`] is the only thing the pipeline needs from persistence:
//! read a whole collection, clear it, and bulk-insert into it.

use crate::loader::{
    Format, StoreError, detect_format, find_collection_file, read_documents,
    validate_collection_name, write_documents,
};
use gearworks_core::Document;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A collection-oriented document store.
pub trait DocumentStore {
    /// Every document of `collection`, in stored order. A missing collection
    /// is empty.
    fn fetch_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Remove every document of `collection`.
    fn clear(&mut self, collection: &str) -> Result<(), StoreError>;

    /// Append `documents` to `collection` as a single all-or-nothing write.
    /// Returns the number of documents inserted.
    fn insert_many(&mut self, collection: &str, documents: Vec<Document>)
    -> Result<usize, StoreError>;
}

// ===========================================================================
// Directory store
// ===========================================================================

/// A store backed by one file per collection in a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where inserts into `collection` are written.
    pub fn json_path(&self, collection: &str) -> PathBuf {
        self.root
            .join(format!("{collection}.{}", Format::Json.extension()))
    }
}

impl DocumentStore for DirStore {
    fn fetch_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        match find_collection_file(&self.root, collection)? {
            Some(path) => {
                let documents = read_documents(&path)?;
                tracing::debug!(file = %path.display(), count = documents.len(), "read collection");
                Ok(documents)
            }
            None => Ok(Vec::new()),
        }
    }

    fn clear(&mut self, collection: &str) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        for format in Format::ALL {
            let path = self
                .root
                .join(format!("{collection}.{}", format.extension()));
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(file = %path.display(), "removed collection file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    fn insert_many(
        &mut self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize, StoreError> {
        let mut all = match find_collection_file(&self.root, collection)? {
            Some(path) => {
                if detect_format(&path)? != Format::Json {
                    return Err(StoreError::ReadOnlyFormat { file: path });
                }
                read_documents(&path)?
            }
            None => Vec::new(),
        };

        let inserted = documents.len();
        all.extend(documents);
        write_documents(&self.json_path(collection), &all)?;
        Ok(inserted)
    }
}

// ===========================================================================
// In-memory store
// ===========================================================================

/// A store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `collection` with `documents`, replacing what was there.
    pub fn with_collection(mut self, collection: &str, documents: Vec<Document>) -> Self {
        self.collections.insert(collection.to_string(), documents);
        self
    }

    /// Borrow a collection without copying it.
    pub fn collection(&self, collection: &str) -> &[Document] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl DocumentStore for MemoryStore {
    fn fetch_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.collection(collection).to_vec())
    }

    fn clear(&mut self, collection: &str) -> Result<(), StoreError> {
        self.collections.remove(collection);
        Ok(())
    }

    fn insert_many(
        &mut self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<usize, StoreError> {
        let inserted = documents.len();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        Ok(inserted)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
