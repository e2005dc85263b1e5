use uuid::Uuid;
use viewledger_core::domain::inputs::Caller;
use viewledger_core::domain::records::{PayoutStatus, TransactionKind, TransactionStatus};
use viewledger_core::store::Store;
use viewledger_core::tracking::error::TrackingError;

mod common;
use crate::common::{service_with_campaign, update_for};

#[tokio::test]
async fn owning_brand_approves_and_earning_is_created() {
    let (store, service, campaign) = service_with_campaign("cpm_campaign.json");
    let influencer = Uuid::new_v4();

    let record = service
        .update_views(update_for(&campaign, influencer, Some(60_000), Some(50_000)))
        .await
        .expect("update views");

    let brand = Caller {
        user_id: campaign.brand_id,
    };
    let approved = service
        .approve_payout(&brand, record.id)
        .await
        .expect("approve payout");

    assert_eq!(approved.payout_status, PayoutStatus::Approved);

    let transactions = store.transactions();
    assert_eq!(transactions.len(), 1);
    let earning = &transactions[0];
    assert_eq!(earning.user_id, influencer);
    assert_eq!(earning.kind, TransactionKind::Earning);
    assert_eq!(earning.status, TransactionStatus::Pending);
    assert_eq!(earning.amount, record.payout_calculated);
    assert!(earning.description.contains("110000"));
}

#[tokio::test]
async fn non_owning_brand_is_rejected_without_mutation() {
    let (store, service, campaign) = service_with_campaign("cpm_campaign.json");

    let record = service
        .update_views(update_for(&campaign, Uuid::new_v4(), Some(10_000), None))
        .await
        .expect("update views");

    let stranger = Caller {
        user_id: Uuid::new_v4(),
    };
    let err = service.approve_payout(&stranger, record.id).await.unwrap_err();

    assert!(matches!(err, TrackingError::NotOwningBrand(_)));
    assert!(err.to_string().contains("not the owning brand"));

    let row = store
        .tracking_by_id(record.id)
        .await
        .expect("read row")
        .expect("row exists");
    assert_eq!(row.payout_status, PayoutStatus::Pending);
    assert!(store.transactions().is_empty());
}

#[tokio::test]
async fn re_approval_is_rejected_and_no_duplicate_earning_appears() {
    let (store, service, campaign) = service_with_campaign("cpm_campaign.json");

    let record = service
        .update_views(update_for(&campaign, Uuid::new_v4(), Some(10_000), None))
        .await
        .expect("update views");

    let brand = Caller {
        user_id: campaign.brand_id,
    };
    service
        .approve_payout(&brand, record.id)
        .await
        .expect("first approval");
    let err = service.approve_payout(&brand, record.id).await.unwrap_err();

    assert!(matches!(err, TrackingError::AlreadyApproved(_)));
    assert_eq!(store.transactions().len(), 1);
}

#[tokio::test]
async fn later_view_updates_leave_approval_untouched() {
    let (_store, service, campaign) = service_with_campaign("cpm_campaign.json");
    let influencer = Uuid::new_v4();

    let record = service
        .update_views(update_for(&campaign, influencer, Some(10_000), None))
        .await
        .expect("update views");
    let brand = Caller {
        user_id: campaign.brand_id,
    };
    service
        .approve_payout(&brand, record.id)
        .await
        .expect("approve payout");

    let refreshed = service
        .update_views(update_for(&campaign, influencer, Some(15_000), None))
        .await
        .expect("update after approval");

    assert_eq!(refreshed.payout_status, PayoutStatus::Approved);
    assert_eq!(refreshed.views_tracked, 15_000);
}

#[tokio::test]
async fn approving_a_missing_record_is_not_found() {
    let (_store, service, campaign) = service_with_campaign("cpm_campaign.json");

    let brand = Caller {
        user_id: campaign.brand_id,
    };
    let err = service
        .approve_payout(&brand, Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, TrackingError::RecordNotFound(_)));
}

#[tokio::test]
async fn update_then_approve_end_to_end() {
    let (store, service, campaign) = service_with_campaign("cpm_campaign.json");
    let influencer = Uuid::new_v4();

    let record = service
        .update_views(update_for(&campaign, influencer, Some(20_000), Some(0)))
        .await
        .expect("update views");
    let brand = Caller {
        user_id: campaign.brand_id,
    };
    let approved = service
        .approve_payout(&brand, record.id)
        .await
        .expect("approve payout");

    assert_eq!(approved.payout_status, PayoutStatus::Approved);
    let transactions = store.transactions();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount, approved.payout_calculated);
}
