pub mod http;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ApiError;
use crate::models::{ChangeSet, RawSlot};

/// Reads and partially updates single appointments.
#[async_trait]
pub trait AppointmentGateway: Send + Sync {
    async fn fetch_detail(&self, appointment_id: i64) -> Result<Value, ApiError>;

    async fn update_partial(&self, appointment_id: i64, changes: &ChangeSet) -> Result<(), ApiError>;
}

#[async_trait]
pub trait BarberDirectory: Send + Sync {
    async fn list_barbers(&self) -> Result<Vec<Value>, ApiError>;
}

/// Free windows for a barber on a day. An empty list is a valid answer.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn fetch_availability(&self, request: &AvailabilityRequest) -> Result<Vec<RawSlot>, ApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityRequest {
    pub barber_id: i64,
    pub date: NaiveDate,
    pub duration: i64,
}

