use crate::{Result, proto::Consignment};

/// A minimal interface for storing consignments.
///
/// Implementations own the sequence exclusively. Callers only ever reach it
/// through [`Self::append`] and [`Self::list_all`], so every access passes the
/// implementation's own synchronization.
pub trait ConsignmentStore: Send + Sync + 'static {
    /// Appends a consignment to the end of the sequence and echoes it back.
    ///
    /// The value is stored as given; nothing is validated or deduplicated.
    fn append(&self, consignment: Consignment) -> Result<Consignment>;

    /// Returns every stored consignment in insertion order.
    fn list_all(&self) -> Vec<Consignment>;
}
