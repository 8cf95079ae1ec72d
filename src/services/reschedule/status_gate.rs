use crate::errors::RescheduleError;
use crate::models::Appointment;

/// Only appointments still in the booked state may be moved.
pub fn check(appointment: &Appointment) -> Result<(), RescheduleError> {
    if appointment.status.permits_reschedule() {
        return Ok(());
    }

    tracing::info!(
        appointment_id = appointment.id,
        status = appointment.status.as_str(),
        raw_status = %appointment.status_raw,
        "appointment not eligible for reschedule"
    );
    Err(RescheduleError::IneligibleStatus {
        status: appointment.status,
        raw_status: appointment.status_raw.clone(),
    })
}
