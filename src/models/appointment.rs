use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode::{self, Aliases};
use super::status::AppointmentStatus;
use super::time::{parse_calendar_date, CanonicalTime};

const ID: Aliases = &["id", "appointment_id", "appointmentId"];
const CLIENT_ID: Aliases = &["client_id", "clientId", "cliente_id", "client.id"];
const CLIENT_NAME: Aliases = &["client_name", "clientName", "cliente_nombre", "client.name", "cliente.nombre"];
const BARBER_ID: Aliases = &["barber_id", "barberId", "barbero_id", "barber.id"];
const BARBER_NAME: Aliases = &["barber_name", "barberName", "barbero_nombre", "barber.name", "barbero.nombre"];
const DATE: Aliases = &["date", "fecha", "appointment_date", "start_datetime"];
const START: Aliases = &["start_time", "start", "startTime", "hora_inicio", "start_datetime"];
const END: Aliases = &["end_time", "end", "endTime", "hora_fin", "end_datetime"];
const STATUS: Aliases = &["status", "estado", "state"];
const SERVICES: Aliases = &["services", "servicios", "service_lines"];

const SERVICE_NAME: Aliases = &["name", "nombre", "service_name", "service.name"];
const SERVICE_PRICE: Aliases = &["price", "precio", "price_minor", "service.price"];
const SERVICE_DURATION: Aliases = &["duration", "duracion", "duration_min", "duration_minutes", "service.duration"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub name: String,
    pub price_minor: i64,
    pub duration_min: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub barber_id: i64,
    pub barber_name: String,
    pub date: Option<NaiveDate>,
    pub start: Option<CanonicalTime>,
    pub end: Option<CanonicalTime>,
    pub status: AppointmentStatus,
    pub status_raw: String,
    pub services: Vec<ServiceLine>,
    pub total_price: i64,
    pub total_duration_min: i64,
    pub service_summary: String,
}

impl Appointment {
    pub fn status_label(&self) -> String {
        self.status.label_or(&self.status_raw)
    }
}

pub fn normalize_service(raw: &Value) -> ServiceLine {
    ServiceLine {
        name: decode::text(raw, SERVICE_NAME),
        price_minor: decode::integer(raw, SERVICE_PRICE),
        duration_min: decode::integer(raw, SERVICE_DURATION),
    }
}

/// `"A, B"` for up to two services, `"A, B (+N)"` beyond that.
pub fn service_summary(services: &[ServiceLine]) -> String {
    let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
    if names.len() <= 2 {
        return names.join(", ");
    }
    format!("{} (+{})", names[..2].join(", "), names.len() - 2)
}

pub fn normalize_appointment(raw: &Value) -> Appointment {
    let services: Vec<ServiceLine> = decode::list(raw, SERVICES)
        .iter()
        .map(normalize_service)
        .collect();
    let status_raw = decode::text(raw, STATUS);

    Appointment {
        id: decode::integer(raw, ID),
        client_id: decode::integer(raw, CLIENT_ID),
        client_name: decode::text(raw, CLIENT_NAME),
        barber_id: decode::integer(raw, BARBER_ID),
        barber_name: decode::text(raw, BARBER_NAME),
        date: decode::opt_text(raw, DATE).and_then(|d| parse_calendar_date(&d)),
        start: decode::opt_text(raw, START).and_then(|t| CanonicalTime::parse_lenient(&t)),
        end: decode::opt_text(raw, END).and_then(|t| CanonicalTime::parse_lenient(&t)),
        status: AppointmentStatus::canonicalize(&status_raw),
        status_raw,
        total_price: services.iter().map(|s| s.price_minor).sum(),
        total_duration_min: services.iter().map(|s| s.duration_min).sum(),
        service_summary: service_summary(&services),
        services,
    }
}
