//! In-memory collection of one record kind.
//!
//! A [`ListState`] is owned by the view that fetched it. Only the submit
//! orchestrator mutates it, one write lock per mutation. Once the view is
//! gone ([`ListState::detach`]), late results from in-flight submissions are
//! dropped instead of applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use homeoware_core::RecordId;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::resources::{self, Resource};

/// Shared handle to one kind's records, newest first.
pub struct ListState<R> {
    inner: Arc<ListInner<R>>,
}

struct ListInner<R> {
    records: RwLock<Vec<R>>,
    detached: AtomicBool,
}

impl<R> Clone for ListState<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> Default for ListState<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ListState<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    #[must_use]
    pub fn from_records(records: Vec<R>) -> Self {
        Self {
            inner: Arc::new(ListInner {
                records: RwLock::new(records),
                detached: AtomicBool::new(false),
            }),
        }
    }

    /// Mark the owning view as gone. Later mutations are ignored.
    pub fn detach(&self) {
        self.inner.detached.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.inner.detached.load(Ordering::Acquire)
    }

    fn accepts(&self, op: &str) -> bool {
        if self.is_detached() {
            debug!(kind = %R::KIND, op, "List detached, dropping mutation");
            return false;
        }
        true
    }

    /// Copy of the current records.
    pub async fn snapshot(&self) -> Vec<R> {
        self.inner.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.records.read().await.is_empty()
    }

    pub async fn find(&self, id: &RecordId) -> Option<R> {
        self.inner
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Put a newly created record at the front.
    pub async fn prepend(&self, record: R) -> bool {
        if !self.accepts("prepend") {
            return false;
        }
        self.inner.records.write().await.insert(0, record);
        true
    }

    /// Replace the entry stored under `id`, in place.
    ///
    /// The stored record always carries `id`, whatever id `record` arrived
    /// with. Returns `false` when no entry has that id.
    pub async fn replace(&self, id: &RecordId, mut record: R) -> bool {
        if !self.accepts("replace") {
            return false;
        }
        record.set_id(id.clone());
        let mut records = self.inner.records.write().await;
        match records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => {
                debug!(kind = %R::KIND, id = %id, "No list entry to replace");
                false
            }
        }
    }

    /// Drop the entry stored under `id`.
    pub async fn remove(&self, id: &RecordId) -> bool {
        if !self.accepts("remove") {
            return false;
        }
        let mut records = self.inner.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        records.len() != before
    }

    /// Replace everything with a fresh fetch.
    pub async fn reset(&self, fresh: Vec<R>) -> bool {
        if !self.accepts("reset") {
            return false;
        }
        *self.inner.records.write().await = fresh;
        true
    }

    /// Fetch the collection and reset the list with it.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure; the list is left as it was.
    #[instrument(skip(self, api), fields(kind = %R::KIND))]
    pub async fn load(&self, api: &ApiClient) -> Result<usize, ApiError> {
        let fresh = resources::fetch_all::<R>(api).await?;
        let count = fresh.len();
        self.reset(fresh).await;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use homeoware_core::{ClientRecord, UserRecord, UserRole};

    use super::*;

    fn client(id: &str, name: &str) -> ClientRecord {
        ClientRecord {
            id: RecordId::new(id),
            name: name.to_string(),
            document: "123.456.789-00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_prepend_and_replace() {
        let list = ListState::from_records(vec![client("1", "Fazenda A"), client("2", "Fazenda B")]);
        list.prepend(client("3", "Fazenda C")).await;

        // The server echoed another id; the entry stays under "2".
        assert!(list.replace(&RecordId::new("2"), client("99", "Fazenda B2")).await);

        let records = list.snapshot().await;
        let ids: Vec<_> = records.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(records[2].name, "Fazenda B2");
    }

    #[tokio::test]
    async fn test_replace_missing_is_noop() {
        let list = ListState::from_records(vec![client("1", "A")]);
        assert!(!list.replace(&RecordId::new("7"), client("7", "X")).await);
        assert_eq!(list.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let list = ListState::from_records(vec![client("1", "A"), client("2", "B")]);
        assert!(list.remove(&RecordId::new("1")).await);
        assert!(!list.remove(&RecordId::new("1")).await);
        assert!(list.find(&RecordId::new("2")).await.is_some());
    }

    #[tokio::test]
    async fn test_detached_list_ignores_mutations() {
        let list: ListState<UserRecord> = ListState::new();
        list.detach();
        let user = UserRecord {
            id: RecordId::new("1"),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            role: UserRole::Administrator,
            notes: None,
        };
        assert!(!list.prepend(user).await);
        assert!(list.is_empty().await);
    }
}
