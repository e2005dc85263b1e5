#![allow(dead_code)]

use std::fs;
use std::sync::Arc;

use uuid::Uuid;
use viewledger_core::domain::inputs::ViewUpdate;
use viewledger_core::domain::records::Campaign;
use viewledger_core::store::memory::MemStore;
use viewledger_core::tracking::service::TrackingService;

pub fn load_campaign(name: &str) -> Campaign {
    let path = format!("tests/fixtures/campaigns/{}", name);
    let s = fs::read_to_string(path).expect("fixture read");
    serde_json::from_str::<Campaign>(&s).expect("fixture parse")
}

/// Service over a fresh in-memory store seeded with one campaign fixture.
pub fn service_with_campaign(name: &str) -> (Arc<MemStore>, TrackingService, Campaign) {
    let store = Arc::new(MemStore::new());
    let campaign = load_campaign(name);
    store.seed_campaign(campaign.clone());
    let service = TrackingService::new(store.clone());
    (store, service, campaign)
}

pub fn update_for(
    campaign: &Campaign,
    influencer_id: Uuid,
    instagram_views: Option<i64>,
    tiktok_views: Option<i64>,
) -> ViewUpdate {
    ViewUpdate {
        campaign_id: campaign.id,
        influencer_id,
        submission_id: None,
        instagram_views,
        tiktok_views,
    }
}
