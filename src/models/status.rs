use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Booked,
    InProgress,
    Completed,
    Cancelled,
    Unknown,
}

/// Every backend spelling we have seen, after `normalize_key`.
const STATUS_TABLE: &[(&str, AppointmentStatus)] = &[
    ("booked", AppointmentStatus::Booked),
    ("scheduled", AppointmentStatus::Booked),
    ("pending", AppointmentStatus::Booked),
    ("confirmed", AppointmentStatus::Booked),
    ("reservado", AppointmentStatus::Booked),
    ("reservada", AppointmentStatus::Booked),
    ("agendado", AppointmentStatus::Booked),
    ("agendada", AppointmentStatus::Booked),
    ("programado", AppointmentStatus::Booked),
    ("programada", AppointmentStatus::Booked),
    ("pendiente", AppointmentStatus::Booked),
    ("confirmado", AppointmentStatus::Booked),
    ("confirmada", AppointmentStatus::Booked),
    ("in progress", AppointmentStatus::InProgress),
    ("inprogress", AppointmentStatus::InProgress),
    ("started", AppointmentStatus::InProgress),
    ("en curso", AppointmentStatus::InProgress),
    ("en proceso", AppointmentStatus::InProgress),
    ("en progreso", AppointmentStatus::InProgress),
    ("iniciado", AppointmentStatus::InProgress),
    ("iniciada", AppointmentStatus::InProgress),
    ("completed", AppointmentStatus::Completed),
    ("done", AppointmentStatus::Completed),
    ("finished", AppointmentStatus::Completed),
    ("completado", AppointmentStatus::Completed),
    ("completada", AppointmentStatus::Completed),
    ("finalizado", AppointmentStatus::Completed),
    ("finalizada", AppointmentStatus::Completed),
    ("terminado", AppointmentStatus::Completed),
    ("terminada", AppointmentStatus::Completed),
    ("cancelled", AppointmentStatus::Cancelled),
    ("canceled", AppointmentStatus::Cancelled),
    ("cancelado", AppointmentStatus::Cancelled),
    ("cancelada", AppointmentStatus::Cancelled),
    ("anulado", AppointmentStatus::Cancelled),
    ("anulada", AppointmentStatus::Cancelled),
];

fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl AppointmentStatus {
    /// Never fails: anything not in the table is `Unknown`.
    pub fn canonicalize(raw: &str) -> Self {
        let key = normalize_key(raw);
        STATUS_TABLE
            .iter()
            .find(|(variant, _)| *variant == key)
            .map(|(_, status)| *status)
            .unwrap_or(AppointmentStatus::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            AppointmentStatus::Booked => Some("Reservada"),
            AppointmentStatus::InProgress => Some("En curso"),
            AppointmentStatus::Completed => Some("Completada"),
            AppointmentStatus::Cancelled => Some("Cancelada"),
            AppointmentStatus::Unknown => None,
        }
    }

    /// Display label, or the raw backend value for `Unknown`.
    pub fn label_or(&self, raw: &str) -> String {
        self.label()
            .map(str::to_string)
            .unwrap_or_else(|| raw.trim().to_string())
    }

    pub fn permits_reschedule(&self) -> bool {
        matches!(self, AppointmentStatus::Booked)
    }
}

pub fn display_status(raw: &str) -> String {
    AppointmentStatus::canonicalize(raw).label_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_spanish_and_english() {
        assert_eq!(AppointmentStatus::canonicalize("Cancelado"), AppointmentStatus::Cancelled);
        assert_eq!(AppointmentStatus::canonicalize("canceled"), AppointmentStatus::Cancelled);
        assert_eq!(AppointmentStatus::canonicalize("RESERVADA"), AppointmentStatus::Booked);
        assert_eq!(AppointmentStatus::canonicalize("completed"), AppointmentStatus::Completed);
    }

    #[test]
    fn test_canonicalize_ignores_case_and_spacing() {
        assert_eq!(AppointmentStatus::canonicalize("  En   Curso "), AppointmentStatus::InProgress);
        assert_eq!(AppointmentStatus::canonicalize("in_progress"), AppointmentStatus::InProgress);
        assert_eq!(AppointmentStatus::canonicalize("In-Progress"), AppointmentStatus::InProgress);
    }

    #[test]
    fn test_unmapped_is_unknown() {
        assert_eq!(AppointmentStatus::canonicalize(""), AppointmentStatus::Unknown);
        assert_eq!(AppointmentStatus::canonicalize("no_show"), AppointmentStatus::Unknown);
    }

    #[test]
    fn test_only_booked_permits_reschedule() {
        assert!(AppointmentStatus::Booked.permits_reschedule());
        for status in [
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Unknown,
        ] {
            assert!(!status.permits_reschedule());
        }
    }

    #[test]
    fn test_display_status_uses_raw_for_unknown() {
        assert_eq!(display_status("cancelado"), "Cancelada");
        assert_eq!(display_status(" No asistió "), "No asistió");
    }
}
