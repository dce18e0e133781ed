//! Charger catalog entry

use rust_decimal::Decimal;

use crate::domain::booking::TimeWindow;
use crate::domain::money::round_amount;

const SECONDS_PER_HOUR: i64 = 3600;

/// A bookable charger as seen by the booking core.
///
/// Registered and maintained by the station catalog; read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct Charger {
    pub id: String,
    pub owner_id: String,
    /// Flat rate per hour, non-negative
    pub price_per_hour: Decimal,
    pub is_active: bool,
}

impl Charger {
    pub fn new(id: impl Into<String>, owner_id: impl Into<String>, price_per_hour: Decimal) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            price_per_hour,
            is_active: true,
        }
    }

    /// Price of a window: `price_per_hour * hours`, rounded to 2 places.
    pub fn price_for(&self, window: &TimeWindow) -> Decimal {
        let seconds = Decimal::from(window.duration_seconds());
        round_amount(self.price_per_hour * seconds / Decimal::from(SECONDS_PER_HOUR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::str::FromStr;

    fn window(a: (u32, u32), b: (u32, u32)) -> TimeWindow {
        TimeWindow::new(
            NaiveTime::from_hms_opt(a.0, a.1, 0).unwrap(),
            NaiveTime::from_hms_opt(b.0, b.1, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn half_hour_at_100_per_hour_costs_50() {
        let c = Charger::new("CH-1", "owner-1", Decimal::from(100));
        let amount = c.price_for(&window((13, 0), (13, 30)));
        assert_eq!(amount, Decimal::from(50));
    }

    #[test]
    fn two_hours_at_100_per_hour_costs_200() {
        let c = Charger::new("CH-1", "owner-1", Decimal::from(100));
        assert_eq!(c.price_for(&window((9, 0), (11, 0))), Decimal::from(200));
    }

    #[test]
    fn odd_durations_round_to_cents() {
        let c = Charger::new("CH-1", "owner-1", Decimal::from_str("10.00").unwrap());
        // 20 minutes = 3.3333.. -> 3.33
        assert_eq!(
            c.price_for(&window((9, 0), (9, 20))),
            Decimal::from_str("3.33").unwrap()
        );
    }
}
