use crate::{Result, proto::Consignment, store::ConsignmentStore};
use parking_lot::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// An append-only, in-process consignment store.
///
/// The sequence lives in a [`Mutex<Vec<_>>`] that is held for the whole of
/// each append and each read, so concurrent appends are serialized and a
/// listing never sees a partially written entry.
///
/// Contents are dropped with the store; nothing is persisted.
///
/// # Example
/// ```
/// use consignment_core::{proto::Consignment, store::{ConsignmentStore, MemoryStore}};
///
/// let store = MemoryStore::new();
/// let stored = store
///     .append(Consignment {
///         id: "A".into(),
///         description: "steel".into(),
///         weight: 500,
///         destination: "Rotterdam".into(),
///         ..Default::default()
///     })
///     .unwrap();
///
/// assert_eq!(stored.id, "A");
/// assert_eq!(store.list_all(), vec![stored]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    consignments: Mutex<Vec<Consignment>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of consignments stored so far.
    pub fn len(&self) -> usize {
        self.consignments.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.consignments.lock().is_empty()
    }
}

impl ConsignmentStore for MemoryStore {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip_all, fields(id = %consignment.id))
    )]
    fn append(&self, consignment: Consignment) -> Result<Consignment> {
        // Clone outside the lock to keep the critical section to the push.
        let stored = consignment.clone();
        self.consignments.lock().push(stored);
        Ok(consignment)
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
    fn list_all(&self) -> Vec<Consignment> {
        self.consignments.lock().clone()
    }
}
