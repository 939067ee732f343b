use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::booking::{Booking, BookingPatch};
use crate::StoreResult;

/// Repository trait for booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Make sure the backing document exists and holds a JSON array.
    async fn ensure_initialized(&self) -> StoreResult<()>;

    /// Every stored booking, in insertion order.
    ///
    /// Read failures degrade to an empty list so the admin listing stays up.
    async fn list_all(&self) -> Vec<Booking>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Booking>;

    /// Store a new `pending` booking built from the client payload.
    async fn append(&self, payload: Map<String, Value>) -> StoreResult<Booking>;

    async fn update_by_id(&self, id: &str, patch: BookingPatch) -> StoreResult<Booking>;

    async fn delete_by_id(&self, id: &str) -> StoreResult<()>;
}
