//! Availability queries
//!
//! Free/claimed is always derived from the charger's active bookings using
//! [`TimeWindow::overlaps`]; slots never carry a booked flag.

use std::sync::Arc;

use chrono::NaiveDate;

use super::slot_catalog::SlotCatalog;
use crate::domain::{
    Charger, DomainError, DomainResult, RepositoryProvider, Slot, SlotAvailability, TimeWindow,
};

pub struct AvailabilityView {
    repos: Arc<dyn RepositoryProvider>,
    catalog: Arc<SlotCatalog>,
}

impl AvailabilityView {
    pub fn new(repos: Arc<dyn RepositoryProvider>, catalog: Arc<SlotCatalog>) -> Self {
        Self { repos, catalog }
    }

    /// Load a charger or fail with `ResourceNotFound`.
    pub async fn charger(&self, charger_id: &str) -> DomainResult<Charger> {
        self.repos
            .chargers()
            .find_by_id(charger_id)
            .await?
            .ok_or_else(|| DomainError::ResourceNotFound(charger_id.to_string()))
    }

    /// Slots of the day not overlapped by any active booking, by start time.
    pub async fn list_free(&self, charger_id: &str, date: NaiveDate) -> DomainResult<Vec<Slot>> {
        Ok(self
            .slot_board(charger_id, date)
            .await?
            .into_iter()
            .filter(|entry| entry.available)
            .map(|entry| entry.slot)
            .collect())
    }

    /// Every slot of the day with its derived availability.
    pub async fn slot_board(
        &self,
        charger_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<SlotAvailability>> {
        self.charger(charger_id).await?;

        let slots = self.catalog.slots_for_day(charger_id, date).await?;
        let active = self
            .repos
            .bookings()
            .find_active_for_day(charger_id, date)
            .await?;

        Ok(slots
            .into_iter()
            .map(|slot| SlotAvailability {
                available: slot.window.is_free_among(&active),
                slot,
            })
            .collect())
    }

    /// True iff no active booking on that charger and day overlaps `window`.
    pub async fn is_window_free(
        &self,
        charger_id: &str,
        date: NaiveDate,
        window: &TimeWindow,
    ) -> DomainResult<bool> {
        let active = self
            .repos
            .bookings()
            .find_active_for_day(charger_id, date)
            .await?;
        Ok(window.is_free_among(&active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Booking, BookingStatus, Payment, SlotSchedule};
    use crate::test_support::{seeded_repos, t, today, window, CHARGER, INACTIVE_CHARGER, OWNER};
    use rust_decimal::Decimal;

    fn view(repos: Arc<dyn RepositoryProvider>) -> AvailabilityView {
        let catalog = Arc::new(SlotCatalog::new(
            repos.clone(),
            SlotSchedule::new(t(6, 0), t(22, 0), 30).unwrap(),
        ));
        AvailabilityView::new(repos, catalog)
    }

    async fn store(repos: &Arc<dyn RepositoryProvider>, id: &str, w: TimeWindow) -> Booking {
        let booking = Booking::new(id, CHARGER, OWNER, "user-1", today(), w, Decimal::from(100));
        let payment = Payment::pending_for(format!("pay-{}", id), &booking);
        repos
            .bookings()
            .create_if_free(booking, payment)
            .await
            .unwrap()
            .booking
    }

    #[tokio::test]
    async fn booked_window_removes_overlapping_slots() {
        let repos = seeded_repos().await;
        let view = view(repos.clone());
        store(&repos, "b-1", window((13, 0), (14, 0))).await;

        let free = view.list_free(CHARGER, today()).await.unwrap();
        assert_eq!(free.len(), 30);
        assert!(free
            .iter()
            .all(|s| !s.window.overlaps(&window((13, 0), (14, 0)))));
        assert!(free.windows(2).all(|p| p[0].window.start < p[1].window.start));
        // neighbours stay bookable
        assert!(free.iter().any(|s| s.window.end == t(13, 0)));
        assert!(free.iter().any(|s| s.window.start == t(14, 0)));
    }

    #[tokio::test]
    async fn cancelled_bookings_free_their_slots() {
        let repos = seeded_repos().await;
        let view = view(repos.clone());
        let booking = store(&repos, "b-1", window((9, 0), (10, 0))).await;

        repos
            .bookings()
            .apply_transition(crate::domain::booking::StatusChange {
                booking_id: booking.id.clone(),
                from: BookingStatus::Pending,
                to: BookingStatus::Cancelled,
                payment: None,
                revenue: None,
                actor_id: None,
                at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(view.list_free(CHARGER, today()).await.unwrap().len(), 32);
        assert!(view
            .is_window_free(CHARGER, today(), &window((9, 0), (10, 0)))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn window_check_uses_half_open_intervals() {
        let repos = seeded_repos().await;
        let view = view(repos.clone());
        store(&repos, "b-1", window((10, 0), (11, 0))).await;

        let cases = [
            (window((9, 0), (10, 0)), true),
            (window((11, 0), (12, 0)), true),
            (window((10, 30), (11, 30)), false),
            (window((9, 0), (12, 0)), false),
        ];
        for (w, expected) in cases {
            let free = view.is_window_free(CHARGER, today(), &w).await.unwrap();
            assert_eq!(free, expected, "window {}", w);
        }
    }

    #[tokio::test]
    async fn board_flags_every_slot() {
        let repos = seeded_repos().await;
        let view = view(repos.clone());
        store(&repos, "b-1", window((6, 0), (6, 30))).await;

        let board = view.slot_board(CHARGER, today()).await.unwrap();
        assert_eq!(board.len(), 32);
        assert!(!board[0].available);
        assert!(board[1..].iter().all(|e| e.available));
    }

    #[tokio::test]
    async fn unknown_charger_is_not_found() {
        let repos = seeded_repos().await;
        let view = view(repos);
        assert!(matches!(
            view.list_free("CH-404", today()).await,
            Err(DomainError::ResourceNotFound(_))
        ));
        // inactive chargers still show their day
        assert_eq!(
            view.list_free(INACTIVE_CHARGER, today()).await.unwrap().len(),
            32
        );
    }
}
