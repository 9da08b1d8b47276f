pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

// Re-export the scheduling primitives other cells build on
pub use models::{
    Doctor, DoctorError, Slot, TimeOfDay, WeeklySchedule, WorkPeriod,
};
pub use services::slots::{generate_slots, BookedTimes};
