use rust_decimal::{Decimal, RoundingStrategy};

/// Capped CPM payout: `min(views, max_views) * cpm_rate / 1000`, rounded to
/// 2 decimal places with round-half-to-even. Negative inputs clamp to zero.
///
/// Monotonically non-decreasing in `views` and bounded above by
/// `max_views * cpm_rate / 1000`. Also used standalone for non-persisting
/// previews.
pub fn cpm_payout(views: i64, cpm_rate: Decimal, max_views: i64) -> Decimal {
    let capped = views.clamp(0, max_views.max(0));
    (Decimal::from(capped) * cpm_rate / Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
