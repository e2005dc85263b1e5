use std::time::Duration;

use rust_decimal::Decimal;
use tokio_postgres::NoTls;
use uuid::Uuid;
use viewledger_core::payout::cpm::cpm_payout;

/// Reconciliation sweep:
/// - load cpm tracking rows joined to their campaign terms
/// - re-derive views_tracked and payout_calculated
/// - repair rows that drifted from the derived values
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().init();

    let db_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    let sweep_interval = std::env::var("RECONCILE_INTERVAL_SECONDS")
        .unwrap_or_else(|_| "300".to_string())
        .parse::<u64>()
        .unwrap_or(300);

    let (client, connection) = tokio_postgres::connect(&db_url, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("db connection error: {e}");
        }
    });

    let sweep_interval = Duration::from_secs(sweep_interval);

    loop {
        tokio::time::sleep(sweep_interval).await;

        match reconcile(&client).await {
            Ok(0) => tracing::info!("reconcile sweep complete, no drift"),
            Ok(repaired) => tracing::info!("reconcile sweep complete, repaired {repaired} rows"),
            Err(e) => tracing::error!("reconcile sweep failed: {e}"),
        }
    }
}

async fn reconcile(client: &tokio_postgres::Client) -> anyhow::Result<u64> {
    let rows = client
        .query(
            "SELECT t.id, t.instagram_views, t.tiktok_views, t.views_tracked, \
             t.payout_calculated, c.cpm_rate, c.max_views \
             FROM campaign_view_tracking t \
             JOIN campaigns c ON c.id = t.campaign_id \
             WHERE c.payment_model = 'cpm'",
            &[],
        )
        .await?;

    let mut repaired = 0u64;
    for row in rows {
        let id: Uuid = row.try_get("id")?;
        let instagram_views: i64 = row.try_get("instagram_views")?;
        let tiktok_views: i64 = row.try_get("tiktok_views")?;
        let stored_views: i64 = row.try_get("views_tracked")?;
        let stored_payout: Decimal = row.try_get("payout_calculated")?;
        let cpm_rate: Decimal = row.try_get("cpm_rate")?;
        let max_views: i64 = row.try_get("max_views")?;

        let views_tracked = instagram_views + tiktok_views;
        let payout = cpm_payout(views_tracked, cpm_rate, max_views);
        if views_tracked != stored_views || payout != stored_payout {
            client
                .execute(
                    "UPDATE campaign_view_tracking \
                     SET views_tracked = $2, payout_calculated = $3 WHERE id = $1",
                    &[&id, &views_tracked, &payout],
                )
                .await?;
            tracing::info!("repaired drifted tracking row {id}");
            repaired += 1;
        }
    }

    Ok(repaired)
}
