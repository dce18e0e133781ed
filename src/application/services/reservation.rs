//! Booking admission and creation
//!
//! Validates a requested window, prices it and hands booking + payment to
//! the repository's critical section, which re-checks overlap under the
//! charger's storage-level lock before inserting anything.

use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveTime};
use tracing::{info, instrument, warn, Span};
use uuid::Uuid;

use super::availability::AvailabilityView;
use crate::config::BookingConfig;
use crate::domain::booking::BookingRecord;
use crate::domain::{
    Booking, BookingStatus, Clock, DomainError, DomainResult, ErrorKind, Payment,
    RepositoryProvider, TimeWindow,
};

/// A request to reserve `[start, end)` on `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub charger_id: String,
    pub requester_id: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Admission rules applied to every new booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPolicy {
    /// Bookable dates are `today ..= today + admission_days`.
    pub admission_days: u32,
    /// Store new bookings as confirmed instead of pending. Confirmation is
    /// bookkeeping only; the payment stays pending either way.
    pub auto_confirm: bool,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            admission_days: 2,
            auto_confirm: false,
        }
    }
}

impl From<&BookingConfig> for ReservationPolicy {
    fn from(cfg: &BookingConfig) -> Self {
        Self {
            admission_days: cfg.admission_days,
            auto_confirm: cfg.auto_confirm,
        }
    }
}

pub struct ReservationEngine {
    repos: Arc<dyn RepositoryProvider>,
    availability: Arc<AvailabilityView>,
    clock: Arc<dyn Clock>,
    policy: ReservationPolicy,
}

impl ReservationEngine {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        availability: Arc<AvailabilityView>,
        clock: Arc<dyn Clock>,
        policy: ReservationPolicy,
    ) -> Self {
        Self {
            repos,
            availability,
            clock,
            policy,
        }
    }

    /// First and last bookable date, both inclusive.
    pub fn admission_window(&self) -> (NaiveDate, NaiveDate) {
        let today = self.clock.today();
        let last = today
            .checked_add_days(Days::new(u64::from(self.policy.admission_days)))
            .unwrap_or(NaiveDate::MAX);
        (today, last)
    }

    /// Create a booking and its pending payment.
    ///
    /// Checks run in this order, first failure wins: window shape, date
    /// range, charger exists, charger active, window free. The window is
    /// then checked again inside the storage transaction; losing that race
    /// is reported as `SlotConflict`. Nothing here is retried.
    #[instrument(
        skip(self, request),
        fields(
            charger_id = %request.charger_id,
            date = %request.date,
            booking_id
        )
    )]
    pub async fn book(&self, request: BookingRequest) -> DomainResult<BookingRecord> {
        match self.try_book(request).await {
            Ok(record) => {
                metrics::counter!("bookings_created_total").increment(1);
                Span::current().record("booking_id", record.booking.id.as_str());
                info!(
                    window = %record.booking.window,
                    amount = %record.booking.total_amount,
                    status = %record.booking.status,
                    "Booking created"
                );
                Ok(record)
            }
            Err(err) => {
                let counter = match err.kind() {
                    ErrorKind::Conflict => "booking_conflicts_total",
                    _ => "booking_rejections_total",
                };
                metrics::counter!(counter, "reason" => err.code()).increment(1);
                Err(err)
            }
        }
    }

    async fn try_book(&self, request: BookingRequest) -> DomainResult<BookingRecord> {
        let window = TimeWindow::new(request.start, request.end)?;

        let (first, last) = self.admission_window();
        if request.date < first || request.date > last {
            return Err(DomainError::DateOutOfWindow {
                date: request.date,
                first,
                last,
            });
        }

        let charger = self.availability.charger(&request.charger_id).await?;
        if !charger.is_active {
            return Err(DomainError::ResourceInactive(charger.id));
        }

        if !self
            .availability
            .is_window_free(&charger.id, request.date, &window)
            .await?
        {
            return Err(DomainError::SlotConflict {
                charger_id: charger.id,
                date: request.date,
            });
        }

        let mut booking = Booking::new(
            Uuid::new_v4().to_string(),
            charger.id.clone(),
            charger.owner_id.clone(),
            request.requester_id,
            request.date,
            window,
            charger.price_for(&window),
        );
        if self.policy.auto_confirm {
            booking.status = BookingStatus::Confirmed;
        }
        let payment = Payment::pending_for(Uuid::new_v4().to_string(), &booking);

        match self.repos.bookings().create_if_free(booking, payment).await {
            Err(DomainError::PersistenceConflict(reason)) => {
                warn!(%reason, "Lost booking race at the storage layer");
                Err(DomainError::SlotConflict {
                    charger_id: charger.id,
                    date: request.date,
                })
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::slot_catalog::SlotCatalog;
    use crate::domain::{PaymentStatus, SlotSchedule};
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::test_support::{
        clock, seeded_db_with, seeded_repos, t, temp_file_config, today, CHARGER, CHEAP_CHARGER,
        INACTIVE_CHARGER,
    };
    use rust_decimal::Decimal;

    fn engine_with(repos: Arc<dyn RepositoryProvider>, policy: ReservationPolicy) -> ReservationEngine {
        let catalog = Arc::new(SlotCatalog::new(
            repos.clone(),
            SlotSchedule::new(t(6, 0), t(22, 0), 30).unwrap(),
        ));
        let availability = Arc::new(AvailabilityView::new(repos.clone(), catalog));
        ReservationEngine::new(repos, availability, clock(), policy)
    }

    fn engine(repos: Arc<dyn RepositoryProvider>) -> ReservationEngine {
        engine_with(repos, ReservationPolicy::default())
    }

    fn request(charger: &str, date: NaiveDate, start: (u32, u32), end: (u32, u32)) -> BookingRequest {
        BookingRequest {
            charger_id: charger.to_string(),
            requester_id: "user-1".to_string(),
            date,
            start: t(start.0, start.1),
            end: t(end.0, end.1),
        }
    }

    fn plus_days(n: u64) -> NaiveDate {
        today().checked_add_days(Days::new(n)).unwrap()
    }

    #[tokio::test]
    async fn prices_half_hour_and_two_hour_windows() {
        let engine = engine(seeded_repos().await);

        let half = engine
            .book(request(CHARGER, today(), (13, 0), (13, 30)))
            .await
            .unwrap();
        assert_eq!(half.booking.total_amount, Decimal::new(5000, 2));
        assert_eq!(half.payment.amount, half.booking.total_amount);

        let two = engine
            .book(request(CHARGER, today(), (9, 0), (11, 0)))
            .await
            .unwrap();
        assert_eq!(two.booking.total_amount, Decimal::new(20000, 2));
    }

    #[tokio::test]
    async fn creates_pending_booking_with_pending_payment() {
        let repos = seeded_repos().await;
        let engine = engine(repos.clone());

        let record = engine
            .book(request(CHARGER, today(), (10, 0), (11, 0)))
            .await
            .unwrap();
        assert_eq!(record.booking.status, BookingStatus::Pending);
        assert_eq!(record.payment.status, PaymentStatus::Pending);

        let stored = repos
            .bookings()
            .find_by_id(&record.booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.window, record.booking.window);
        let payment = repos
            .bookings()
            .find_payment(&record.booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.amount, stored.total_amount);
    }

    #[tokio::test]
    async fn auto_confirm_policy_stores_confirmed_booking() {
        let engine = engine_with(
            seeded_repos().await,
            ReservationPolicy {
                auto_confirm: true,
                ..ReservationPolicy::default()
            },
        );
        let record = engine
            .book(request(CHARGER, today(), (10, 0), (11, 0)))
            .await
            .unwrap();
        assert_eq!(record.booking.status, BookingStatus::Confirmed);
        assert_eq!(record.payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn inverted_or_empty_window_is_always_invalid() {
        let engine = engine(seeded_repos().await);
        let cases = [
            request(CHARGER, today(), (10, 0), (10, 0)),
            request(CHARGER, today(), (11, 0), (10, 0)),
            request("CH-404", today(), (11, 0), (10, 0)),
            request(INACTIVE_CHARGER, plus_days(30), (11, 0), (10, 0)),
        ];
        for req in cases {
            assert!(matches!(
                engine.book(req).await,
                Err(DomainError::InvalidWindow { .. })
            ));
        }
    }

    #[tokio::test]
    async fn admission_window_is_inclusive_of_today_plus_two() {
        let engine = engine(seeded_repos().await);

        assert!(engine
            .book(request(CHARGER, plus_days(2), (9, 0), (10, 0)))
            .await
            .is_ok());
        assert!(matches!(
            engine
                .book(request(CHARGER, plus_days(3), (9, 0), (10, 0)))
                .await,
            Err(DomainError::DateOutOfWindow { .. })
        ));
        let yesterday = today().pred_opt().unwrap();
        assert!(matches!(
            engine.book(request(CHARGER, yesterday, (9, 0), (10, 0))).await,
            Err(DomainError::DateOutOfWindow { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_and_inactive_chargers_are_rejected() {
        let engine = engine(seeded_repos().await);
        assert!(matches!(
            engine.book(request("CH-404", today(), (9, 0), (10, 0))).await,
            Err(DomainError::ResourceNotFound(_))
        ));
        assert!(matches!(
            engine
                .book(request(INACTIVE_CHARGER, today(), (9, 0), (10, 0)))
                .await,
            Err(DomainError::ResourceInactive(_))
        ));
    }

    #[tokio::test]
    async fn overlapping_request_conflicts_but_adjacent_succeeds() {
        let engine = engine(seeded_repos().await);
        engine
            .book(request(CHARGER, today(), (10, 0), (11, 0)))
            .await
            .unwrap();

        assert!(matches!(
            engine
                .book(request(CHARGER, today(), (10, 30), (11, 30)))
                .await,
            Err(DomainError::SlotConflict { .. })
        ));
        engine
            .book(request(CHARGER, today(), (11, 0), (12, 0)))
            .await
            .unwrap();
        // same window on another charger is independent
        engine
            .book(request(CHEAP_CHARGER, today(), (10, 0), (11, 0)))
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_overlapping_requests_admit_exactly_one() {
        let repos = seeded_repos().await;
        let engine = Arc::new(engine(repos.clone()));

        let attempts = (0..8).map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let mut req = request(CHARGER, today(), (14, 0), (15, 0));
                req.requester_id = format!("user-{}", i);
                engine.book(req).await
            })
        });
        let results: Vec<_> = futures_util::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::SlotConflict { .. })))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);

        let active = repos
            .bookings()
            .find_active_for_day(CHARGER, today())
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn pooled_file_database_admits_one_of_many_racing_requests() {
        let (config, path) = temp_file_config(8);
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(seeded_db_with(&config).await));
        let engine = Arc::new(engine(repos.clone()));

        let racers = 16;
        let attempts = (0..racers).map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                let mut req = request(CHARGER, today(), (16, 0), (17, 0));
                req.requester_id = format!("user-{}", i);
                engine.book(req).await
            })
        });
        let results: Vec<_> = futures_util::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::SlotConflict { .. })))
            .count();
        assert_eq!(successes, 1, "{:?}", results);
        assert_eq!(conflicts, racers - 1, "{:?}", results);

        let active = repos
            .bookings()
            .find_active_for_day(CHARGER, today())
            .await
            .unwrap();
        assert_eq!(active.len(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn active_bookings_never_overlap_after_many_requests() {
        let repos = seeded_repos().await;
        let engine = engine(repos.clone());

        let windows = [
            ((9, 0), (10, 0)),
            ((9, 30), (10, 30)),
            ((10, 0), (10, 30)),
            ((8, 0), (12, 0)),
            ((10, 30), (11, 0)),
            ((6, 0), (9, 0)),
        ];
        for (start, end) in windows {
            let _ = engine.book(request(CHARGER, today(), start, end)).await;
            let active = repos
                .bookings()
                .find_active_for_day(CHARGER, today())
                .await
                .unwrap();
            for (i, a) in active.iter().enumerate() {
                for b in &active[i + 1..] {
                    assert!(!a.window.overlaps(&b.window), "{} vs {}", a.window, b.window);
                }
            }
        }
    }
}
