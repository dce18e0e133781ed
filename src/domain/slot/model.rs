//! Bookable slot units

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::domain::booking::TimeWindow;
use crate::domain::error::{DomainError, DomainResult};

/// One fixed-length bookable unit of a charger's day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub charger_id: String,
    pub slot_date: NaiveDate,
    pub window: TimeWindow,
}

/// A slot plus whether any active booking overlaps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: Slot,
    pub available: bool,
}

/// Opening hours and unit length used to carve a day into slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSchedule {
    opening: NaiveTime,
    closing: NaiveTime,
    unit: Duration,
}

impl SlotSchedule {
    pub fn new(opening: NaiveTime, closing: NaiveTime, unit_minutes: u32) -> DomainResult<Self> {
        if unit_minutes == 0 {
            return Err(DomainError::Validation(
                "Slot length must be positive".into(),
            ));
        }
        if closing <= opening {
            return Err(DomainError::Validation(format!(
                "Closing time {} must be after opening time {}",
                closing, opening
            )));
        }
        Ok(Self {
            opening,
            closing,
            unit: Duration::minutes(i64::from(unit_minutes)),
        })
    }

    /// Consecutive units from opening; a unit is included only if it ends
    /// at or before closing.
    pub fn windows(&self) -> Vec<TimeWindow> {
        let mut windows = Vec::new();
        let mut start = self.opening;
        loop {
            let (end, wrapped) = start.overflowing_add_signed(self.unit);
            if wrapped != 0 || end > self.closing || end <= start {
                break;
            }
            windows.push(TimeWindow { start, end });
            start = end;
        }
        windows
    }

    /// The day's slot units for one charger.
    pub fn units_for(&self, charger_id: &str, date: NaiveDate) -> Vec<Slot> {
        self.windows()
            .into_iter()
            .map(|window| Slot {
                charger_id: charger_id.to_string(),
                slot_date: date,
                window,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn default_day_has_32_half_hour_units() {
        let schedule = SlotSchedule::new(t(6, 0), t(22, 0), 30).unwrap();
        let windows = schedule.windows();
        assert_eq!(windows.len(), 32);
        assert_eq!(windows[0].start, t(6, 0));
        assert_eq!(windows[31].end, t(22, 0));
        assert!(windows.windows(2).all(|p| p[0].end == p[1].start));
    }

    #[test]
    fn partial_trailing_unit_is_dropped() {
        let schedule = SlotSchedule::new(t(6, 0), t(7, 45), 30).unwrap();
        let windows = schedule.windows();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[2].end, t(7, 30));
    }

    #[test]
    fn unit_running_to_midnight_stops() {
        let schedule = SlotSchedule::new(t(23, 0), t(23, 59), 30).unwrap();
        assert_eq!(schedule.windows().len(), 1);
    }

    #[test]
    fn rejects_bad_schedules() {
        assert!(SlotSchedule::new(t(6, 0), t(22, 0), 0).is_err());
        assert!(SlotSchedule::new(t(22, 0), t(6, 0), 30).is_err());
    }
}
