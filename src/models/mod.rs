pub mod appointment;
pub mod barber;
pub mod change_set;
pub mod decode;
pub mod dispatch;
pub mod review;
pub mod slot;
pub mod status;
pub mod time;

pub use appointment::{normalize_appointment, Appointment, ServiceLine};
pub use barber::{merge_barbers, normalize_barber, Barber};
pub use change_set::{ChangeSet, ScheduleFields};
pub use dispatch::{normalize_dispatch, Dispatch};
pub use review::{normalize_review, Review};
pub use slot::{RawSlot, TimeSlot};
pub use status::{display_status, AppointmentStatus};
pub use time::{CanonicalTime, ParseError};
