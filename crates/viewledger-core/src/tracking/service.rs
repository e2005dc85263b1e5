use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::inputs::{Caller, ViewUpdate};
use crate::domain::records::{
    PaymentModel, PayoutStatus, TrackingRecord, Transaction, TransactionKind, TransactionStatus,
};
use crate::payout::cpm::cpm_payout;
use crate::store::Store;
use crate::tracking::error::TrackingError;

/// Update and approval protocol over the tracking ledger. One cohesive unit:
/// the pure payout formula plus a stateful upsert/approve flow against an
/// injected store.
pub struct TrackingService {
    store: Arc<dyn Store>,
}

impl TrackingService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Merge a partial view update into the row for the (campaign, influencer)
    /// pair, re-derive `views_tracked` and `payout_calculated`, and persist as
    /// one upsert. Applies only to campaigns on the cpm payment model.
    pub async fn update_views(&self, update: ViewUpdate) -> Result<TrackingRecord, TrackingError> {
        if update.instagram_views.is_some_and(|v| v < 0)
            || update.tiktok_views.is_some_and(|v| v < 0)
        {
            return Err(TrackingError::NegativeViews);
        }

        let campaign = self
            .store
            .campaign(update.campaign_id)
            .await?
            .ok_or(TrackingError::CampaignNotFound(update.campaign_id))?;
        if campaign.payment_model != PaymentModel::Cpm {
            return Err(TrackingError::UnsupportedPaymentModel(campaign.id));
        }

        let existing = self
            .store
            .tracking_by_pair(update.campaign_id, update.influencer_id)
            .await?;

        // Supplied fields overwrite, absent fields retain the stored value
        // (zero for a first update). Status survives the upsert untouched.
        let (id, payout_status, prev_instagram, prev_tiktok, prev_submission) = match &existing {
            Some(row) => (
                row.id,
                row.payout_status,
                row.instagram_views,
                row.tiktok_views,
                row.submission_id,
            ),
            None => (Uuid::new_v4(), PayoutStatus::Pending, 0, 0, None),
        };

        let instagram_views = update.instagram_views.unwrap_or(prev_instagram);
        let tiktok_views = update.tiktok_views.unwrap_or(prev_tiktok);
        let views_tracked = instagram_views + tiktok_views;

        let record = TrackingRecord {
            id,
            campaign_id: update.campaign_id,
            influencer_id: update.influencer_id,
            submission_id: update.submission_id.or(prev_submission),
            instagram_views,
            tiktok_views,
            views_tracked,
            payout_calculated: cpm_payout(views_tracked, campaign.cpm_rate, campaign.max_views),
            payout_status,
            last_checked_at: Utc::now(),
        };

        Ok(self.store.upsert_tracking(record).await?)
    }

    /// Approve the payout on a pending tracking row. Only the owning brand of
    /// the campaign may approve; approval creates a pending earning
    /// transaction for the influencer as a second, dependent write.
    pub async fn approve_payout(
        &self,
        caller: &Caller,
        tracking_id: Uuid,
    ) -> Result<TrackingRecord, TrackingError> {
        let record = self
            .store
            .tracking_by_id(tracking_id)
            .await?
            .ok_or(TrackingError::RecordNotFound(tracking_id))?;
        let campaign = self
            .store
            .campaign(record.campaign_id)
            .await?
            .ok_or(TrackingError::CampaignNotFound(record.campaign_id))?;

        if caller.user_id != campaign.brand_id {
            return Err(TrackingError::NotOwningBrand(campaign.id));
        }
        if record.payout_status == PayoutStatus::Approved {
            return Err(TrackingError::AlreadyApproved(tracking_id));
        }

        let approved = self
            .store
            .set_payout_status(tracking_id, PayoutStatus::Approved)
            .await?;

        let earning = Transaction {
            id: Uuid::new_v4(),
            user_id: approved.influencer_id,
            kind: TransactionKind::Earning,
            status: TransactionStatus::Pending,
            amount: approved.payout_calculated,
            description: format!("CPM earnings for {} tracked views", approved.views_tracked),
            created_at: Utc::now(),
        };
        if let Err(err) = self.store.insert_transaction(earning).await {
            // The status write has already landed at this point.
            tracing::error!(
                "earning transaction insert failed after approving {tracking_id}: {err}"
            );
            return Err(err.into());
        }

        Ok(approved)
    }
}
