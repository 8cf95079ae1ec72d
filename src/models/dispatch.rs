use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode::{self, Aliases};
use super::time::parse_calendar_date;

const ID: Aliases = &["id", "dispatch_id", "despacho_id"];
const APPOINTMENT_ID: Aliases = &["appointment_id", "appointmentId", "cita_id", "appointment.id"];
const BARBER_ID: Aliases = &["barber_id", "barberId", "barber.id"];
const BARBER_NAME: Aliases = &["barber_name", "barber.name", "barbero_nombre"];
const CLIENT_NAME: Aliases = &["client_name", "client.name", "cliente_nombre"];
const DATE: Aliases = &["date", "fecha", "dispatched_at", "created_at"];
const TOTAL: Aliases = &["total", "amount", "monto", "total_price"];
const NOTES: Aliases = &["notes", "notas", "observaciones"];

/// A completed service handed off at the counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispatch {
    pub id: i64,
    pub appointment_id: i64,
    pub barber_id: i64,
    pub barber_name: String,
    pub client_name: String,
    pub date: Option<NaiveDate>,
    pub total: i64,
    pub notes: String,
}

pub fn normalize_dispatch(raw: &Value) -> Dispatch {
    Dispatch {
        id: decode::integer(raw, ID),
        appointment_id: decode::integer(raw, APPOINTMENT_ID),
        barber_id: decode::integer(raw, BARBER_ID),
        barber_name: decode::text(raw, BARBER_NAME),
        client_name: decode::text(raw, CLIENT_NAME),
        date: decode::opt_text(raw, DATE).and_then(|d| parse_calendar_date(&d)),
        total: decode::integer(raw, TOTAL),
        notes: decode::text(raw, NOTES),
    }
}
