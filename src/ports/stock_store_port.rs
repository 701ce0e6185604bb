//! Remote record store port trait.

use crate::domain::error::StockdeskError;
use crate::domain::record::{Record, RecordId, RecordPayload};

/// CRUD access to the authoritative record store.
///
/// Each call is one round trip; implementations never retry.
pub trait StockStorePort {
    fn list(&self) -> Result<Vec<Record>, StockdeskError>;

    /// Returns the created record with its server-assigned id.
    fn create(&self, payload: &RecordPayload) -> Result<Record, StockdeskError>;

    /// Returns the stored representation; its id is always `id`.
    fn update(&self, id: RecordId, payload: &RecordPayload) -> Result<Record, StockdeskError>;

    fn delete(&self, id: RecordId) -> Result<(), StockdeskError>;
}
