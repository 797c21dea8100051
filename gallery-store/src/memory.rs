//! In-memory blob store.
//!
//! Backs local development without credentials and serves as the test
//! double for the gateway. Every call is counted per operation, and any
//! operation can be made to fail on demand.

use std::{
    collections::{BTreeMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        RwLock,
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use gallery_core::{Pathname, StoredObject};

use crate::backend::{object_url, BlobStore, FetchedObject, PutOptions};
use crate::StoreError;

/// Base URL used by [`MemoryBlobStore::new`].
pub const DEFAULT_BASE_URL: &str = "http://memory.blob.local";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A [`BlobStore`] operation, used for call counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Put,
    List,
    Delete,
    Fetch,
}

#[derive(Debug)]
struct Entry {
    body: Bytes,
    meta: StoredObject,
}

#[derive(Debug, Default)]
struct CallCounts {
    put: AtomicUsize,
    list: AtomicUsize,
    delete: AtomicUsize,
    fetch: AtomicUsize,
}

impl CallCounts {
    fn counter(&self, op: Operation) -> &AtomicUsize {
        match op {
            Operation::Put => &self.put,
            Operation::List => &self.list,
            Operation::Delete => &self.delete,
            Operation::Fetch => &self.fetch,
        }
    }
}

/// Thread-safe in-process object store.
///
/// Objects are listed in pathname order. Deleting a missing pathname
/// succeeds, matching the Vercel API.
#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<BTreeMap<String, Entry>>,
    calls: CallCounts,
    failing: RwLock<HashSet<Operation>>,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    /// Create an empty store serving objects under [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create an empty store serving objects under `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            objects: RwLock::new(BTreeMap::new()),
            calls: CallCounts::default(),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Number of times `op` has been called, including failed calls.
    #[must_use]
    pub fn calls(&self, op: Operation) -> usize {
        self.calls.counter(op).load(Ordering::SeqCst)
    }

    /// Number of calls across all operations.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        [Operation::Put, Operation::List, Operation::Delete, Operation::Fetch]
            .into_iter()
            .map(|op| self.calls(op))
            .sum()
    }

    /// Make every subsequent call to `op` fail with [`StoreError::Unavailable`].
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn fail_on(&self, op: Operation) {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.failing
            .write()
            .expect("memory store failure lock poisoned")
            .insert(op);
    }

    /// Return `true` if an object is stored under `pathname`.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn contains(&self, pathname: &str) -> bool {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.objects
            .read()
            .expect("memory store read lock poisoned")
            .contains_key(pathname)
    }

    /// Bytes stored under `pathname`, if any.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn body(&self, pathname: &str) -> Option<Bytes> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.objects
            .read()
            .expect("memory store read lock poisoned")
            .get(pathname)
            .map(|e| e.body.clone())
    }

    /// Count the call and fail it if `op` was marked with [`Self::fail_on`].
    fn begin(&self, op: Operation) -> Result<(), StoreError> {
        self.calls.counter(op).fetch_add(1, Ordering::SeqCst);
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let failing = self
            .failing
            .read()
            .expect("memory store failure lock poisoned")
            .contains(&op);
        if failing {
            return Err(StoreError::Unavailable(format!("{op:?} disabled")));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        pathname: &Pathname,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<StoredObject, StoreError> {
        self.begin(Operation::Put)?;

        let url = self.public_url(pathname);
        let mut meta = StoredObject::new(pathname.as_str(), url.clone());
        meta.download_url = Some(format!("{url}?download=1"));
        meta.size = u64::try_from(body.len()).ok();
        meta.uploaded_at = Some(Utc::now());
        meta.content_type = Some(
            options
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
        );
        meta.content_disposition = Some(format!("inline; filename=\"{}\"", pathname.leaf()));

        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.objects
            .write()
            .expect("memory store write lock poisoned")
            .insert(pathname.as_str().to_owned(), Entry { body, meta: meta.clone() });
        Ok(meta)
    }

    async fn list(&self) -> Result<Vec<StoredObject>, StoreError> {
        self.begin(Operation::List)?;
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let objects = self
            .objects
            .read()
            .expect("memory store read lock poisoned")
            .values()
            .map(|e| e.meta.clone())
            .collect();
        Ok(objects)
    }

    async fn delete(&self, pathname: &Pathname) -> Result<(), StoreError> {
        self.begin(Operation::Delete)?;
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        self.objects
            .write()
            .expect("memory store write lock poisoned")
            .remove(pathname.as_str());
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<FetchedObject, StoreError> {
        self.begin(Operation::Fetch)?;
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let objects = self.objects.read().expect("memory store read lock poisoned");
        let entry = objects
            .values()
            .find(|e| e.meta.url == url)
            .ok_or_else(|| StoreError::Fetch { url: url.to_owned(), status: 404 })?;
        Ok(FetchedObject {
            body: entry.body.clone(),
            content_type: entry.meta.content_type.clone(),
        })
    }

    fn public_url(&self, pathname: &Pathname) -> String {
        object_url(&self.base_url, pathname)
    }
}
