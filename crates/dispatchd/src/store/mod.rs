//! Document store behind the dispatch workflows.
//!
//! The raw trait deals in JSON bodies keyed by collection and id; `StoreExt`
//! layers typed access on top. Lists come back in first-insert order so
//! every "earliest" selection rule is deterministic across backends.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use dispatch_shared::{Collection, DispatchError, Document, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub trait DispatchStore: Send + Sync {
    /// Backend name reported by the health endpoint
    fn backend(&self) -> &'static str;

    fn get_raw(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// All bodies in the collection, in first-insert order
    fn list_raw(&self, collection: Collection) -> Result<Vec<Value>>;

    /// Insert or replace. A replaced document keeps its original position.
    fn put_raw(&self, collection: Collection, id: &str, body: Value) -> Result<()>;

    fn delete_raw(&self, collection: Collection, id: &str) -> Result<bool>;
}

pub type SharedStore = Arc<dyn DispatchStore>;

/// Typed access for any store
pub trait StoreExt: DispatchStore {
    fn get<D: Document>(&self, id: &str) -> Result<Option<D>> {
        match self.get_raw(D::COLLECTION, id)? {
            Some(body) => Ok(Some(serde_json::from_value(body)?)),
            None => Ok(None),
        }
    }

    /// Like `get`, but a missing document is `NotFound`
    fn require<D: Document>(&self, id: &str) -> Result<D> {
        self.get(id)?
            .ok_or_else(|| DispatchError::not_found(D::COLLECTION.entity(), id))
    }

    fn list<D: Document>(&self) -> Result<Vec<D>> {
        self.list_raw(D::COLLECTION)?
            .into_iter()
            .map(|body| serde_json::from_value(body).map_err(DispatchError::from))
            .collect()
    }

    fn list_where<D, F>(&self, mut predicate: F) -> Result<Vec<D>>
    where
        D: Document,
        F: FnMut(&D) -> bool,
    {
        let docs: Vec<D> = self.list()?;
        Ok(docs.into_iter().filter(|d| predicate(d)).collect())
    }

    fn find_first<D, F>(&self, mut predicate: F) -> Result<Option<D>>
    where
        D: Document,
        F: FnMut(&D) -> bool,
    {
        let docs: Vec<D> = self.list()?;
        Ok(docs.into_iter().find(|d| predicate(d)))
    }

    fn put<D: Document>(&self, doc: &D) -> Result<()> {
        debug!("store put {}/{}", D::COLLECTION, doc.id());
        self.put_raw(D::COLLECTION, doc.id(), serde_json::to_value(doc)?)
    }

    fn delete<D: Document>(&self, id: &str) -> Result<bool> {
        debug!("store delete {}/{}", D::COLLECTION, id);
        self.delete_raw(D::COLLECTION, id)
    }
}

impl<S: DispatchStore + ?Sized> StoreExt for S {}

pub(crate) fn store_err(e: impl std::fmt::Display) -> DispatchError {
    DispatchError::Store(e.to_string())
}
