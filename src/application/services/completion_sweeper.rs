//! Background task that completes confirmed bookings once their window
//! has ended.
//!
//! Disabled unless `booking.completion_sweep_secs` is non-zero; completion
//! can equally be driven from outside through the admin API.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{info, warn};

use super::lifecycle::BookingLifecycle;
use crate::domain::Clock;
use crate::shared::shutdown::ShutdownSignal;

pub fn start_completion_sweeper(
    lifecycle: Arc<BookingLifecycle>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownSignal,
    check_interval_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(check_interval = check_interval_secs, "Completion sweeper started");

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = lifecycle.complete_elapsed(clock.now()).await {
                        warn!(error = %e, "Completion sweep failed");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Completion sweeper shutting down");
                    break;
                }
            }
        }

        info!("Completion sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Actor, Booking, BookingStatus, FixedClock, Payment};
    use crate::test_support::{seeded_repos, t, today, window, CHARGER, OWNER};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn sweeper_completes_elapsed_booking_and_stops_on_shutdown() {
        let repos = seeded_repos().await;
        let lifecycle = Arc::new(BookingLifecycle::new(repos.clone(), 3));

        let booking = Booking::new("b-1", CHARGER, OWNER, "user-1", today(), window((9, 0), (10, 0)), Decimal::from(100));
        let payment = Payment::pending_for("pay-b-1", &booking);
        repos.bookings().create_if_free(booking, payment).await.unwrap();
        lifecycle.confirm("b-1", &Actor::user("user-1")).await.unwrap();

        let clock = Arc::new(FixedClock(today().and_time(t(10, 30))));
        let shutdown = ShutdownSignal::new();
        let handle = start_completion_sweeper(lifecycle, clock, shutdown.clone(), 1);

        // the first tick fires immediately
        let mut status = BookingStatus::Confirmed;
        for _ in 0..50 {
            status = repos.bookings().find_by_id("b-1").await.unwrap().unwrap().status;
            if status == BookingStatus::Completed {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(status, BookingStatus::Completed);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
