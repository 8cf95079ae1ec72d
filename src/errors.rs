use crate::models::AppointmentStatus;

pub const GENERIC_SUBMIT_ERROR: &str = "No se pudo reprogramar la cita. Intenta de nuevo.";
pub const GENERIC_FETCH_ERROR: &str = "No se pudo cargar la cita.";

/// Failure reported by one of the backend collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthorized,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message shown to the user: the server's own text when it sent one.
    pub fn user_message(&self) -> String {
        self.message_or(GENERIC_SUBMIT_ERROR)
    }

    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.trim().to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RescheduleError {
    #[error("appointment cannot be rescheduled while {}", .status.label_or(.raw_status))]
    IneligibleStatus {
        status: AppointmentStatus,
        raw_status: String,
    },

    #[error("failed to load appointment: {0}")]
    DetailFetch(String),

    #[error("{0}")]
    Submission(String),

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("action not available on step {0}")]
    WrongStep(u8),

    #[error("step {0} is no longer complete")]
    IncompleteDraft(u8),

    #[error("wizard is not open for editing")]
    NotEditing,
}

/// A selection or step transition the wizard refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    #[error("barber {0} is not in the list")]
    UnknownBarber(i64),

    #[error("date {date} is before {today}")]
    PastDate {
        date: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },

    #[error("slot is not among the available slots")]
    SlotUnavailable,

    #[error("step {0} is incomplete")]
    Incomplete(u8),

    #[error("already on the first step")]
    AtFirstStep,

    #[error("already on the last step")]
    AtLastStep,

    #[error("wizard is not open for editing")]
    NotEditing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Status {
            status: 409,
            message: Some("El horario ya no está disponible".to_string()),
        };
        assert_eq!(err.user_message(), "El horario ya no está disponible");
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let blank = ApiError::Status {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message(), GENERIC_SUBMIT_ERROR);
        assert_eq!(ApiError::Unauthorized.user_message(), GENERIC_SUBMIT_ERROR);
    }
}
