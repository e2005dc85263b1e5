use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::records::{Campaign, PayoutStatus, TrackingRecord, Transaction};

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("tracking row '{0}' is missing")]
    MissingRow(Uuid),
}

/// Key-based read/upsert/insert over the three record shapes. Injected into
/// the tracking service so callers pick the backend: Postgres in the server,
/// `memory::MemStore` in tests and local development.
#[async_trait]
pub trait Store: Send + Sync {
    async fn campaign(&self, id: Uuid) -> Result<Option<Campaign>, StoreError>;

    async fn tracking_by_id(&self, id: Uuid) -> Result<Option<TrackingRecord>, StoreError>;

    async fn tracking_by_pair(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
    ) -> Result<Option<TrackingRecord>, StoreError>;

    /// Atomic insert-or-update keyed on (campaign_id, influencer_id). A row
    /// that already exists for the pair keeps its original id.
    async fn upsert_tracking(&self, record: TrackingRecord) -> Result<TrackingRecord, StoreError>;

    async fn set_payout_status(
        &self,
        id: Uuid,
        status: PayoutStatus,
    ) -> Result<TrackingRecord, StoreError>;

    async fn insert_transaction(&self, tx: Transaction) -> Result<(), StoreError>;
}
