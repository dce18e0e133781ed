//! Application layer: the booking core's use cases, wired over the
//! repository ports.

pub mod services;

use std::sync::Arc;

use crate::config::BookingConfig;
use crate::domain::{Clock, DomainResult, RepositoryProvider};

pub use services::{
    start_completion_sweeper, AvailabilityView, BookingLifecycle, BookingRequest,
    ReservationEngine, ReservationPolicy, RevenueAggregator, SlotCatalog,
};

/// The wired set of booking services, shared by the HTTP layer and
/// background tasks.
#[derive(Clone)]
pub struct BookingServices {
    pub catalog: Arc<SlotCatalog>,
    pub availability: Arc<AvailabilityView>,
    pub reservations: Arc<ReservationEngine>,
    pub lifecycle: Arc<BookingLifecycle>,
    pub revenue: Arc<RevenueAggregator>,
    pub clock: Arc<dyn Clock>,
}

impl BookingServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        config: &BookingConfig,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        let catalog = Arc::new(SlotCatalog::new(repos.clone(), config.schedule()?));
        let availability = Arc::new(AvailabilityView::new(repos.clone(), catalog.clone()));
        let reservations = Arc::new(ReservationEngine::new(
            repos.clone(),
            availability.clone(),
            clock.clone(),
            ReservationPolicy::from(config),
        ));
        let lifecycle = Arc::new(BookingLifecycle::new(
            repos.clone(),
            config.transition_attempts,
        ));
        let revenue = Arc::new(RevenueAggregator::new(repos));

        Ok(Self {
            catalog,
            availability,
            reservations,
            lifecycle,
            revenue,
            clock,
        })
    }
}
