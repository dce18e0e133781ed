//! SeaORM implementation of BookingRepository
//!
//! Booking creation runs as one transaction per attempt:
//!
//! 1. bump the charger's `booking_guards` row (upsert, `version + 1`),
//!    which takes the write lock every other attempt on that charger
//!    needs as well;
//! 2. read the charger's active bookings for the day and re-check overlap;
//! 3. insert booking, payment and creation event;
//! 4. commit.
//!
//! An attempt that loses the race either waits for the lock and then sees
//! the winner's row in step 2, or gets a contention error from the driver,
//! which `db_err` maps to `PersistenceConflict`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::db_err;
use crate::domain::booking::{
    Booking, BookingEvent, BookingRecord, BookingRepository, BookingStatus, PaymentChange,
    StatusChange, TimeWindow,
};
use crate::domain::money::{from_cents, to_cents};
use crate::domain::payment::Payment;
use crate::domain::revenue::RevenueDelta;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    booking, booking_event, booking_guard, owner_revenue, payment,
};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model) -> DomainResult<Booking> {
    Ok(Booking {
        status: m.status.parse()?,
        id: m.id,
        charger_id: m.charger_id,
        owner_id: m.owner_id,
        requester_id: m.requester_id,
        booking_date: m.booking_date,
        window: TimeWindow {
            start: m.start_time,
            end: m.end_time,
        },
        total_amount: from_cents(m.total_cents),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn models_to_domain(models: Vec<booking::Model>) -> DomainResult<Vec<Booking>> {
    models.into_iter().map(model_to_domain).collect()
}

fn payment_to_domain(m: payment::Model) -> DomainResult<Payment> {
    Ok(Payment {
        status: m.status.parse()?,
        id: m.id,
        booking_id: m.booking_id,
        amount: from_cents(m.amount_cents),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn event_to_domain(m: booking_event::Model) -> DomainResult<BookingEvent> {
    Ok(BookingEvent {
        from_status: m
            .from_status
            .as_deref()
            .map(str::parse::<BookingStatus>)
            .transpose()?,
        to_status: m.to_status.parse()?,
        booking_id: m.booking_id,
        actor_id: m.actor_id,
        created_at: m.created_at,
    })
}

// ── Statement helpers (usable inside and outside a transaction) ─

async fn claim_guard<C: ConnectionTrait>(
    conn: &C,
    charger_id: &str,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let guard = booking_guard::ActiveModel {
        charger_id: Set(charger_id.to_string()),
        version: Set(1),
        updated_at: Set(at),
    };
    booking_guard::Entity::insert(guard)
        .on_conflict(
            OnConflict::column(booking_guard::Column::ChargerId)
                .value(
                    booking_guard::Column::Version,
                    Expr::col(booking_guard::Column::Version).add(1),
                )
                .update_column(booking_guard::Column::UpdatedAt)
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn active_for_day<C: ConnectionTrait>(
    conn: &C,
    charger_id: &str,
    date: NaiveDate,
) -> DomainResult<Vec<Booking>> {
    let statuses = BookingStatus::ACTIVE.iter().map(|s| s.as_str());
    let models = booking::Entity::find()
        .filter(booking::Column::ChargerId.eq(charger_id))
        .filter(booking::Column::BookingDate.eq(date))
        .filter(booking::Column::Status.is_in(statuses))
        .order_by_asc(booking::Column::StartTime)
        .all(conn)
        .await
        .map_err(db_err)?;
    models_to_domain(models)
}

async fn record_event<C: ConnectionTrait>(
    conn: &C,
    booking_id: &str,
    from: Option<BookingStatus>,
    to: BookingStatus,
    actor_id: Option<String>,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let event = booking_event::ActiveModel {
        booking_id: Set(booking_id.to_string()),
        from_status: Set(from.map(|s| s.as_str().to_string())),
        to_status: Set(to.as_str().to_string()),
        actor_id: Set(actor_id),
        created_at: Set(at),
        ..Default::default()
    };
    event.insert(conn).await.map_err(db_err)?;
    Ok(())
}

async fn move_payment<C: ConnectionTrait>(
    conn: &C,
    booking_id: &str,
    change: PaymentChange,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let result = payment::Entity::update_many()
        .col_expr(payment::Column::Status, Expr::value(change.to.as_str()))
        .col_expr(payment::Column::UpdatedAt, Expr::value(at))
        .filter(payment::Column::BookingId.eq(booking_id))
        .filter(payment::Column::Status.eq(change.from.as_str()))
        .exec(conn)
        .await
        .map_err(db_err)?;
    if result.rows_affected == 0 {
        return Err(DomainError::PersistenceConflict(format!(
            "Payment of booking {} is no longer {}",
            booking_id, change.from
        )));
    }
    Ok(())
}

async fn adjust_revenue<C: ConnectionTrait>(
    conn: &C,
    delta: &RevenueDelta,
    at: DateTime<Utc>,
) -> DomainResult<()> {
    let row = owner_revenue::ActiveModel {
        owner_id: Set(delta.owner_id.clone()),
        total_cents: Set(delta.amount_cents),
        updated_at: Set(at),
    };
    owner_revenue::Entity::insert(row)
        .on_conflict(
            OnConflict::column(owner_revenue::Column::OwnerId)
                .value(
                    owner_revenue::Column::TotalCents,
                    Expr::col(owner_revenue::Column::TotalCents).add(delta.amount_cents),
                )
                .update_column(owner_revenue::Column::UpdatedAt)
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        booking::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_payment(&self, booking_id: &str) -> DomainResult<Option<Payment>> {
        payment::Entity::find()
            .filter(payment::Column::BookingId.eq(booking_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(payment_to_domain)
            .transpose()
    }

    async fn find_active_for_day(
        &self,
        charger_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Booking>> {
        active_for_day(&self.db, charger_id, date).await
    }

    async fn find_by_requester(&self, requester_id: &str) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::RequesterId.eq(requester_id))
            .order_by_desc(booking::Column::BookingDate)
            .order_by_desc(booking::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_chargers(&self, charger_ids: &[String]) -> DomainResult<Vec<Booking>> {
        if charger_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = booking::Entity::find()
            .filter(booking::Column::ChargerId.is_in(charger_ids.iter().cloned()))
            .order_by_desc(booking::Column::BookingDate)
            .order_by_desc(booking::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_confirmed_until(&self, date: NaiveDate) -> DomainResult<Vec<Booking>> {
        let models = booking::Entity::find()
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
            .filter(booking::Column::BookingDate.lte(date))
            .order_by_asc(booking::Column::BookingDate)
            .order_by_asc(booking::Column::EndTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn create_if_free(
        &self,
        b: Booking,
        p: Payment,
    ) -> DomainResult<BookingRecord> {
        let total_cents = to_cents(b.total_amount)?;
        let amount_cents = to_cents(p.amount)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        claim_guard(&txn, &b.charger_id, b.created_at).await?;

        let active = active_for_day(&txn, &b.charger_id, b.booking_date).await?;
        if !b.window.is_free_among(&active) {
            debug!(
                "Window {} on {} {} taken inside critical section",
                b.window, b.charger_id, b.booking_date
            );
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::SlotConflict {
                charger_id: b.charger_id,
                date: b.booking_date,
            });
        }

        let row = booking::ActiveModel {
            id: Set(b.id.clone()),
            charger_id: Set(b.charger_id.clone()),
            owner_id: Set(b.owner_id.clone()),
            requester_id: Set(b.requester_id.clone()),
            booking_date: Set(b.booking_date),
            start_time: Set(b.window.start),
            end_time: Set(b.window.end),
            total_cents: Set(total_cents),
            status: Set(b.status.as_str().to_string()),
            created_at: Set(b.created_at),
            updated_at: Set(b.updated_at),
        };
        row.insert(&txn).await.map_err(db_err)?;

        let payment_row = payment::ActiveModel {
            id: Set(p.id.clone()),
            booking_id: Set(p.booking_id.clone()),
            amount_cents: Set(amount_cents),
            status: Set(p.status.as_str().to_string()),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        };
        payment_row.insert(&txn).await.map_err(db_err)?;

        record_event(
            &txn,
            &b.id,
            None,
            b.status,
            Some(b.requester_id.clone()),
            b.created_at,
        )
        .await?;

        txn.commit().await.map_err(db_err)?;
        debug!("Booking {} stored for {} {}", b.id, b.charger_id, b.window);

        Ok(BookingRecord {
            booking: b,
            payment: p,
        })
    }

    async fn apply_transition(&self, change: StatusChange) -> DomainResult<Booking> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let result = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(change.to.as_str()))
            .col_expr(booking::Column::UpdatedAt, Expr::value(change.at))
            .filter(booking::Column::Id.eq(change.booking_id.as_str()))
            .filter(booking::Column::Status.eq(change.from.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::PersistenceConflict(format!(
                "Booking {} is no longer {}",
                change.booking_id, change.from
            )));
        }

        if let Some(payment_change) = change.payment {
            move_payment(&txn, &change.booking_id, payment_change, change.at).await?;
        }
        if let Some(delta) = &change.revenue {
            adjust_revenue(&txn, delta, change.at).await?;
        }
        record_event(
            &txn,
            &change.booking_id,
            Some(change.from),
            change.to,
            change.actor_id.clone(),
            change.at,
        )
        .await?;

        txn.commit().await.map_err(db_err)?;

        self.find_by_id(&change.booking_id)
            .await?
            .ok_or_else(|| DomainError::booking_not_found(&change.booking_id))
    }

    async fn history(&self, booking_id: &str) -> DomainResult<Vec<BookingEvent>> {
        let models = booking_event::Entity::find()
            .filter(booking_event::Column::BookingId.eq(booking_id))
            .order_by_asc(booking_event::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(event_to_domain).collect()
    }
}
