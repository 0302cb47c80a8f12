//! Smoking baseline: cigarettes per day and price per pack before quitting.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Self-reported smoking habit. The most recent record per user is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokingBaseline {
    pub id: i64,
    pub user_id: String,
    pub cigarettes_per_day: u32,
    pub price_per_pack: Decimal,
    pub recorded_at: DateTime<Utc>,
}

impl SmokingBaseline {
    /// Price of one cigarette, `price_per_pack / pack_size` rounded half-up to cents.
    pub fn price_per_cigarette(&self, pack_size: u32) -> Decimal {
        price_per_cigarette(self.price_per_pack, pack_size)
    }
}

/// `price_per_pack / pack_size`, 2 decimal places, half-up. A zero pack size yields zero.
pub fn price_per_cigarette(price_per_pack: Decimal, pack_size: u32) -> Decimal {
    if pack_size == 0 {
        return Decimal::ZERO;
    }
    (price_per_pack / Decimal::from(pack_size))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
