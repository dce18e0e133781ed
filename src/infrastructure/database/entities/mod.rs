//! Database entities module

pub mod booking;
pub mod booking_event;
pub mod booking_guard;
pub mod charger;
pub mod owner_revenue;
pub mod payment;
pub mod slot;

pub use booking::Entity as Booking;
pub use booking_event::Entity as BookingEvent;
pub use booking_guard::Entity as BookingGuard;
pub use charger::Entity as Charger;
pub use owner_revenue::Entity as OwnerRevenue;
pub use payment::Entity as Payment;
pub use slot::Entity as Slot;
