use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("campaign '{0}' not found")]
    CampaignNotFound(Uuid),

    #[error("tracking record '{0}' not found")]
    RecordNotFound(Uuid),

    #[error("campaign '{0}' is not on the cpm payment model")]
    UnsupportedPaymentModel(Uuid),

    #[error("view counts must be non-negative")]
    NegativeViews,

    #[error("caller is not the owning brand of campaign '{0}'")]
    NotOwningBrand(Uuid),

    #[error("payout for tracking record '{0}' is already approved")]
    AlreadyApproved(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
