use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};
use uuid::Uuid;
use viewledger_core::domain::records::{
    Campaign, PaymentModel, PayoutStatus, TrackingRecord, Transaction,
};
use viewledger_core::store::{Store, StoreError};

const TRACKING_COLUMNS: &str = "id, campaign_id, influencer_id, submission_id, instagram_views, \
     tiktok_views, views_tracked, payout_calculated, payout_status, last_checked_at";

/// Postgres-backed store. The upsert is a native `ON CONFLICT` write on the
/// (campaign_id, influencer_id) natural key, so concurrent first inserts for
/// one pair merge instead of duplicating.
pub struct PgStore {
    client: Client,
}

impl PgStore {
    pub async fn connect(db_url: &str) -> anyhow::Result<Self> {
        let (client, connection) = tokio_postgres::connect(db_url, NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("db connection error: {e}");
            }
        });
        Ok(Self { client })
    }
}

fn backend_err(e: tokio_postgres::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn campaign_from_row(row: &Row) -> Result<Campaign, StoreError> {
    let model: String = row.try_get("payment_model").map_err(backend_err)?;
    let payment_model = PaymentModel::parse(&model)
        .ok_or_else(|| StoreError::Backend(format!("unknown payment_model '{model}'")))?;
    Ok(Campaign {
        id: row.try_get("id").map_err(backend_err)?,
        brand_id: row.try_get("brand_id").map_err(backend_err)?,
        payment_model,
        cpm_rate: row.try_get("cpm_rate").map_err(backend_err)?,
        max_views: row.try_get("max_views").map_err(backend_err)?,
    })
}

fn tracking_from_row(row: &Row) -> Result<TrackingRecord, StoreError> {
    let status: String = row.try_get("payout_status").map_err(backend_err)?;
    let payout_status = PayoutStatus::parse(&status)
        .ok_or_else(|| StoreError::Backend(format!("unknown payout_status '{status}'")))?;
    Ok(TrackingRecord {
        id: row.try_get("id").map_err(backend_err)?,
        campaign_id: row.try_get("campaign_id").map_err(backend_err)?,
        influencer_id: row.try_get("influencer_id").map_err(backend_err)?,
        submission_id: row.try_get("submission_id").map_err(backend_err)?,
        instagram_views: row.try_get("instagram_views").map_err(backend_err)?,
        tiktok_views: row.try_get("tiktok_views").map_err(backend_err)?,
        views_tracked: row.try_get("views_tracked").map_err(backend_err)?,
        payout_calculated: row.try_get("payout_calculated").map_err(backend_err)?,
        payout_status,
        last_checked_at: row.try_get("last_checked_at").map_err(backend_err)?,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn campaign(&self, id: Uuid) -> Result<Option<Campaign>, StoreError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, brand_id, payment_model, cpm_rate, max_views \
                 FROM campaigns WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(backend_err)?;
        row.as_ref().map(campaign_from_row).transpose()
    }

    async fn tracking_by_id(&self, id: Uuid) -> Result<Option<TrackingRecord>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!("SELECT {TRACKING_COLUMNS} FROM campaign_view_tracking WHERE id = $1"),
                &[&id],
            )
            .await
            .map_err(backend_err)?;
        row.as_ref().map(tracking_from_row).transpose()
    }

    async fn tracking_by_pair(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
    ) -> Result<Option<TrackingRecord>, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "SELECT {TRACKING_COLUMNS} FROM campaign_view_tracking \
                     WHERE campaign_id = $1 AND influencer_id = $2"
                ),
                &[&campaign_id, &influencer_id],
            )
            .await
            .map_err(backend_err)?;
        row.as_ref().map(tracking_from_row).transpose()
    }

    async fn upsert_tracking(&self, record: TrackingRecord) -> Result<TrackingRecord, StoreError> {
        // payout_status stays out of the conflict update: an approval that
        // lands between this call's read and write is not clobbered.
        let status = record.payout_status.as_str();
        let row = self
            .client
            .query_one(
                &format!(
                    "INSERT INTO campaign_view_tracking ({TRACKING_COLUMNS}) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
                     ON CONFLICT (campaign_id, influencer_id) DO UPDATE SET \
                         submission_id = EXCLUDED.submission_id, \
                         instagram_views = EXCLUDED.instagram_views, \
                         tiktok_views = EXCLUDED.tiktok_views, \
                         views_tracked = EXCLUDED.views_tracked, \
                         payout_calculated = EXCLUDED.payout_calculated, \
                         last_checked_at = EXCLUDED.last_checked_at \
                     RETURNING {TRACKING_COLUMNS}"
                ),
                &[
                    &record.id,
                    &record.campaign_id,
                    &record.influencer_id,
                    &record.submission_id,
                    &record.instagram_views,
                    &record.tiktok_views,
                    &record.views_tracked,
                    &record.payout_calculated,
                    &status,
                    &record.last_checked_at,
                ],
            )
            .await
            .map_err(backend_err)?;
        tracking_from_row(&row)
    }

    async fn set_payout_status(
        &self,
        id: Uuid,
        status: PayoutStatus,
    ) -> Result<TrackingRecord, StoreError> {
        let row = self
            .client
            .query_opt(
                &format!(
                    "UPDATE campaign_view_tracking SET payout_status = $2 \
                     WHERE id = $1 RETURNING {TRACKING_COLUMNS}"
                ),
                &[&id, &status.as_str()],
            )
            .await
            .map_err(backend_err)?;
        row.as_ref()
            .map(tracking_from_row)
            .transpose()?
            .ok_or(StoreError::MissingRow(id))
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<(), StoreError> {
        self.client
            .execute(
                "INSERT INTO transactions (id, user_id, kind, status, amount, description, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &tx.id,
                    &tx.user_id,
                    &tx.kind.as_str(),
                    &tx.status.as_str(),
                    &tx.amount,
                    &tx.description,
                    &tx.created_at,
                ],
            )
            .await
            .map_err(backend_err)?;
        Ok(())
    }
}
