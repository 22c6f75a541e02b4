//! Abstract interface for the external document store.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

/// Marker trait for document store errors.
pub trait StoreError: Error + Send + Sync + 'static {}

/// A named collection of documents, addressed by document ID.
///
/// # Required Methods
/// - `del`: Removes a document. Removing a missing document is not an error.
/// - `get`: Reads a document.
/// - `ids`: Lists the IDs of every document in the collection.
/// - `put`: Writes (creates or replaces) a document.
#[async_trait]
pub trait Collection
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the collection.
    type Error: StoreError;

    /// Removes a document from the collection.
    async fn del<K: Into<String> + Send>(&self, id: K) -> Result<(), Self::Error>;

    /// Reads a document from the collection.
    async fn get<K: Into<String> + Send>(&self, id: K) -> Result<Option<Bytes>, Self::Error>;

    /// Lists the IDs of all documents in the collection.
    async fn ids(&self) -> Result<Vec<String>, Self::Error>;

    /// Writes a document to the collection.
    async fn put<K: Into<String> + Send>(&self, id: K, bytes: Bytes) -> Result<(), Self::Error>;
}

/// A document store made of named collections.
///
/// Handles returned by `collection` for the same name must observe each
/// other's writes.
pub trait DocumentStore
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the store.
    type Error: StoreError;

    /// The collection handle type.
    type Collection: Collection<Error = Self::Error>;

    /// Opens a named collection.
    fn collection<S: Into<String> + Send>(&self, name: S) -> Self::Collection;
}
