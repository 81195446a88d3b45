//! Platform fee and creator revenue split.

use rust_decimal::{Decimal, RoundingStrategy};
use soundwave_core::error::AnalyticsError;

/// Marketplace share of every sale, as a fraction of the gross amount (5%).
#[must_use]
pub fn platform_fee_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// Most decimal places a stored money value keeps.
pub const MAX_MONEY_SCALE: u32 = 8;

/// Exclusive upper bound on a single money value (10^12).
#[must_use]
pub fn money_limit() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

/// Rejects values the event tables cannot hold exactly.
fn check_money(field: &str, value: Decimal) -> Result<(), AnalyticsError> {
    if value < Decimal::ZERO {
        return Err(AnalyticsError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    if value.normalize().scale() > MAX_MONEY_SCALE {
        return Err(AnalyticsError::Validation(format!(
            "{field} must have at most {MAX_MONEY_SCALE} decimal places"
        )));
    }
    if value >= money_limit() {
        return Err(AnalyticsError::Validation(format!(
            "{field} must be less than {}",
            money_limit()
        )));
    }
    Ok(())
}

/// How a gross amount divides between the marketplace and the creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueSplit {
    /// Marketplace share.
    pub platform_fee: Decimal,
    /// Creator share.
    pub creator_revenue: Decimal,
}

impl RevenueSplit {
    /// Computes the default split: the fee is 5% of `amount` rounded half
    /// away from zero to two places, and the creator gets the remainder.
    #[must_use]
    pub fn standard(amount: Decimal) -> Self {
        let platform_fee = (amount * platform_fee_rate())
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            platform_fee,
            creator_revenue: amount - platform_fee,
        }
    }

    /// Resolves the split for a transaction. Omitted parts are derived:
    /// neither supplied uses [`RevenueSplit::standard`], one supplied takes
    /// the other as the remainder of `amount`, both supplied are kept as is.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::Validation` if `amount`, a supplied part, or a
    /// derived remainder is negative, has more than [`MAX_MONEY_SCALE`]
    /// decimal places, or reaches [`money_limit`].
    pub fn resolve(
        amount: Decimal,
        platform_fee: Option<Decimal>,
        creator_revenue: Option<Decimal>,
    ) -> Result<Self, AnalyticsError> {
        check_money("amount", amount)?;

        let split = match (platform_fee, creator_revenue) {
            (None, None) => Self::standard(amount),
            (Some(platform_fee), None) => Self {
                platform_fee,
                creator_revenue: amount - platform_fee,
            },
            (None, Some(creator_revenue)) => Self {
                platform_fee: amount - creator_revenue,
                creator_revenue,
            },
            (Some(platform_fee), Some(creator_revenue)) => Self {
                platform_fee,
                creator_revenue,
            },
        };

        check_money("platformFee", split.platform_fee)?;
        check_money("creatorRevenue", split.creator_revenue)?;
        Ok(split)
    }
}
