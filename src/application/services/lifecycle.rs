//! Booking status transitions
//!
//! Every transition is a read, a decision and a conditional write that only
//! applies if the booking is still in the status that was read. A stale
//! write is re-read and re-decided a bounded number of times.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::booking::{BookingRecord, PaymentChange, StatusChange};
use crate::domain::revenue::RevenueDelta;
use crate::domain::money::to_cents;
use crate::domain::{
    Actor, Booking, BookingEvent, BookingFilter, BookingStatus, DomainError, DomainResult,
    RepositoryProvider,
};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

pub struct BookingLifecycle {
    repos: Arc<dyn RepositoryProvider>,
    retry: RetryConfig,
}

impl BookingLifecycle {
    pub fn new(repos: Arc<dyn RepositoryProvider>, transition_attempts: u32) -> Self {
        Self {
            repos,
            retry: RetryConfig::contention(transition_attempts),
        }
    }

    /// pending -> confirmed, by the requester or an administrator.
    pub async fn confirm(&self, booking_id: &str, actor: &Actor) -> DomainResult<Booking> {
        self.transition(booking_id, BookingStatus::Confirmed, Some(actor))
            .await
    }

    /// pending|confirmed -> cancelled, by the requester or an administrator.
    /// A pending or completed payment is refunded in the same transaction.
    pub async fn cancel(&self, booking_id: &str, actor: &Actor) -> DomainResult<Booking> {
        self.transition(booking_id, BookingStatus::Cancelled, Some(actor))
            .await
    }

    /// confirmed -> completed. `actor` is `None` for system triggers such
    /// as the completion sweep. Payment status is left alone.
    pub async fn complete(&self, booking_id: &str, actor: Option<&Actor>) -> DomainResult<Booking> {
        self.transition(booking_id, BookingStatus::Completed, actor)
            .await
    }

    /// Booking with its payment, visible to the requester or an administrator.
    pub async fn get(&self, booking_id: &str, actor: &Actor) -> DomainResult<BookingRecord> {
        let booking = self.load(booking_id).await?;
        if !actor.may_manage(&booking) {
            return Err(DomainError::AccessDenied(format!(
                "booking {} belongs to another requester",
                booking_id
            )));
        }
        let payment = self
            .repos
            .bookings()
            .find_payment(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Payment",
                field: "booking_id",
                value: booking_id.to_string(),
            })?;
        Ok(BookingRecord { booking, payment })
    }

    pub async fn list(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>> {
        match filter {
            BookingFilter::Requester(requester_id) => {
                self.repos.bookings().find_by_requester(requester_id).await
            }
            BookingFilter::Charger(charger_id) => {
                self.repos
                    .bookings()
                    .find_by_chargers(std::slice::from_ref(charger_id))
                    .await
            }
            BookingFilter::Owner(owner_id) => {
                let ids: Vec<String> = self
                    .repos
                    .chargers()
                    .find_by_owner(owner_id)
                    .await?
                    .into_iter()
                    .map(|c| c.id)
                    .collect();
                self.repos.bookings().find_by_chargers(&ids).await
            }
        }
    }

    /// Status audit trail, oldest first.
    pub async fn history(&self, booking_id: &str, actor: &Actor) -> DomainResult<Vec<BookingEvent>> {
        let booking = self.load(booking_id).await?;
        if !actor.may_manage(&booking) {
            return Err(DomainError::AccessDenied(format!(
                "booking {} belongs to another requester",
                booking_id
            )));
        }
        self.repos.bookings().history(booking_id).await
    }

    /// Complete every confirmed booking whose window ended at or before
    /// `now`. Returns how many were completed; individual failures are
    /// logged and skipped.
    pub async fn complete_elapsed(&self, now: NaiveDateTime) -> DomainResult<usize> {
        let candidates = self
            .repos
            .bookings()
            .find_confirmed_until(now.date())
            .await?;

        let mut completed = 0;
        for booking in candidates.into_iter().filter(|b| b.ends_at() <= now) {
            match self.complete(&booking.id, None).await {
                Ok(_) => completed += 1,
                Err(e) => warn!(booking_id = %booking.id, error = %e, "Could not complete elapsed booking"),
            }
        }
        if completed > 0 {
            info!(completed, "Completed elapsed bookings");
        }
        Ok(completed)
    }

    async fn load(&self, booking_id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::booking_not_found(booking_id))
    }

    async fn transition(
        &self,
        booking_id: &str,
        target: BookingStatus,
        actor: Option<&Actor>,
    ) -> DomainResult<Booking> {
        let booking = retry_with_backoff(
            self.retry.clone(),
            || self.try_transition(booking_id, target, actor),
            DomainError::is_stale_write,
            "booking_transition",
        )
        .await?;

        metrics::counter!("booking_transitions_total", "to" => target.as_str()).increment(1);
        info!(booking_id, status = %target, "Booking transitioned");
        Ok(booking)
    }

    async fn try_transition(
        &self,
        booking_id: &str,
        target: BookingStatus,
        actor: Option<&Actor>,
    ) -> DomainResult<Booking> {
        let booking = self.load(booking_id).await?;

        if let Some(actor) = actor {
            if !actor.may_manage(&booking) {
                return Err(DomainError::AccessDenied(format!(
                    "{} may not change booking {}",
                    actor.id, booking_id
                )));
            }
        }
        booking.check_transition(target)?;

        let payment = if target == BookingStatus::Cancelled {
            self.repos
                .bookings()
                .find_payment(booking_id)
                .await?
                .and_then(|p| {
                    p.status
                        .on_cancellation()
                        .map(|to| PaymentChange { from: p.status, to })
                })
        } else {
            None
        };

        let revenue = RevenueDelta::for_transition(
            &booking.owner_id,
            to_cents(booking.total_amount)?,
            booking.status,
            target,
        );

        debug!(
            booking_id,
            from = %booking.status,
            to = %target,
            refund = payment.is_some(),
            "Applying transition"
        );

        self.repos
            .bookings()
            .apply_transition(StatusChange {
                booking_id: booking.id,
                from: booking.status,
                to: target,
                payment,
                revenue,
                actor_id: actor.map(|a| a.id.clone()),
                at: Utc::now(),
            })
            .await
    }
}
