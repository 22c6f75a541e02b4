//! In-memory implementation of the document store for local development
//! and tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use exp3_store::{Collection, DocumentStore};
use tokio::sync::Mutex;
use tracing::warn;

type Documents = Arc<Mutex<HashMap<String, Bytes>>>;

/// In-memory document store.
///
/// Clones share the same documents, so a clone handed to one manager sees
/// writes made through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    documents: Documents,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail (or succeed again) with
    /// [`Error::Unavailable`]. Used to exercise error paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl DocumentStore for MemoryStore {
    type Error = Error;
    type Collection = MemoryCollection;

    fn collection<S: Into<String> + Send>(&self, name: S) -> Self::Collection {
        MemoryCollection {
            documents: self.documents.clone(),
            name: name.into(),
            unavailable: self.unavailable.clone(),
        }
    }
}

/// A single named collection inside a [`MemoryStore`].
#[derive(Clone, Debug)]
pub struct MemoryCollection {
    documents: Documents,
    name: String,
    unavailable: Arc<AtomicBool>,
}

impl MemoryCollection {
    fn key<K: Into<String>>(&self, id: K) -> String {
        format!("{}:{}", self.name, id.into())
    }

    fn check_available(&self) -> Result<(), Error> {
        if self.unavailable.load(Ordering::SeqCst) {
            warn!(collection = %self.name, "memory store marked unavailable");
            return Err(Error::Unavailable);
        }

        Ok(())
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    type Error = Error;

    async fn del<K: Into<String> + Send>(&self, id: K) -> Result<(), Self::Error> {
        self.check_available()?;
        self.documents.lock().await.remove(&self.key(id));
        Ok(())
    }

    async fn get<K: Into<String> + Send>(&self, id: K) -> Result<Option<Bytes>, Self::Error> {
        self.check_available()?;
        let documents = self.documents.lock().await;
        Ok(documents.get(&self.key(id)).cloned())
    }

    async fn ids(&self) -> Result<Vec<String>, Self::Error> {
        self.check_available()?;
        let prefix = format!("{}:", self.name);
        let documents = self.documents.lock().await;

        let mut ids: Vec<String> = documents
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(ToString::to_string)
            .collect();
        ids.sort();

        Ok(ids)
    }

    async fn put<K: Into<String> + Send>(&self, id: K, bytes: Bytes) -> Result<(), Self::Error> {
        self.check_available()?;
        self.documents.lock().await.insert(self.key(id), bytes);
        Ok(())
    }
}
