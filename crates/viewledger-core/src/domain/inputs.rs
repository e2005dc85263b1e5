use serde::Deserialize;
use uuid::Uuid;

/// Partial update for a tracking row. Every field declares its
/// update-or-retain semantics explicitly: `Some` overwrites the stored value,
/// `None` retains it (zero when no row exists for the pair yet).
#[derive(Debug, Clone, Deserialize)]
pub struct ViewUpdate {
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub submission_id: Option<Uuid>,
    pub instagram_views: Option<i64>,
    pub tiktok_views: Option<i64>,
}

/// Authenticated caller identity, resolved by the upstream auth layer.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
}
