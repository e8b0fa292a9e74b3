pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{AppointmentError, AppointmentListQuery};
pub use router::appointment_routes;
pub use services::{AppointmentBookingService, AppointmentLifecycleService};
