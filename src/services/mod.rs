pub mod api;
pub mod cache;
pub mod reschedule;
pub mod slots;
