use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::records::{Campaign, PayoutStatus, TrackingRecord, Transaction};
use crate::store::{Store, StoreError};

/// In-memory store for tests and local development. Upsert atomicity comes
/// from holding the write lock across the lookup-and-write.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    campaigns: HashMap<Uuid, Campaign>,
    rows: HashMap<Uuid, TrackingRecord>,
    pair_index: HashMap<(Uuid, Uuid), Uuid>,
    transactions: Vec<Transaction>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_campaign(&self, campaign: Campaign) {
        if let Ok(mut inner) = self.inner.write() {
            inner.campaigns.insert(campaign.id, campaign);
        }
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner
            .read()
            .map(|inner| inner.transactions.clone())
            .unwrap_or_default()
    }

    pub fn tracking_row_count(&self) -> usize {
        self.inner.read().map(|inner| inner.rows.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl Store for MemStore {
    async fn campaign(&self, id: Uuid) -> Result<Option<Campaign>, StoreError> {
        Ok(self.read()?.campaigns.get(&id).cloned())
    }

    async fn tracking_by_id(&self, id: Uuid) -> Result<Option<TrackingRecord>, StoreError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    async fn tracking_by_pair(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
    ) -> Result<Option<TrackingRecord>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .pair_index
            .get(&(campaign_id, influencer_id))
            .and_then(|id| inner.rows.get(id))
            .cloned())
    }

    async fn upsert_tracking(&self, record: TrackingRecord) -> Result<TrackingRecord, StoreError> {
        let mut inner = self.write()?;
        let key = (record.campaign_id, record.influencer_id);
        let id = match inner.pair_index.get(&key).copied() {
            Some(existing) => existing,
            None => {
                inner.pair_index.insert(key, record.id);
                record.id
            }
        };
        let stored = TrackingRecord { id, ..record };
        inner.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn set_payout_status(
        &self,
        id: Uuid,
        status: PayoutStatus,
    ) -> Result<TrackingRecord, StoreError> {
        let mut inner = self.write()?;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::MissingRow(id))?;
        row.payout_status = status;
        Ok(row.clone())
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<(), StoreError> {
        self.write()?.transactions.push(tx);
        Ok(())
    }
}
