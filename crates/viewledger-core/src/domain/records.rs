use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentModel {
    Cpm,
    Fixed,
}

impl PaymentModel {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentModel::Cpm => "cpm",
            PaymentModel::Fixed => "fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cpm" => Some(PaymentModel::Cpm),
            "fixed" => Some(PaymentModel::Fixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Approved,
}

impl PayoutStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Approved => "approved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PayoutStatus::Pending),
            "approved" => Some(PayoutStatus::Approved),
            _ => None,
        }
    }
}

/// Campaign fields this subsystem reads. Campaigns are owned elsewhere; only
/// the payment terms and the owning brand matter here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub payment_model: PaymentModel,
    /// Currency units per 1000 tracked views.
    pub cpm_rate: Decimal,
    /// Views ceiling beyond which no further payout accrues.
    pub max_views: i64,
}

/// One row per campaign x influencer. `views_tracked` and `payout_calculated`
/// are derived on every update and never independently settable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub submission_id: Option<Uuid>,
    pub instagram_views: i64,
    pub tiktok_views: i64,
    pub views_tracked: i64,
    pub payout_calculated: Decimal,
    pub payout_status: PayoutStatus,
    pub last_checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Earning,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Earning => "earning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
        }
    }
}

/// Earning transaction created when a payout is approved. Settlement is a
/// downstream concern; rows are written here with status `pending` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
