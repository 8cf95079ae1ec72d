use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use super::{AppointmentGateway, AvailabilityRequest, AvailabilitySource, BarberDirectory};
use crate::errors::ApiError;
use crate::models::decode::{self, Aliases};
use crate::models::{ChangeSet, RawSlot};
use crate::session::SessionContext;

const ENVELOPE: Aliases = &["data", "results", "slots", "available_slots", "items"];
const SLOT_START: Aliases = &["start", "start_time", "startTime", "hora_inicio"];
const SLOT_END: Aliases = &["end", "end_time", "endTime", "hora_fin"];
const ERROR_MESSAGE: Aliases = &["message", "error", "detail", "mensaje", "error.message"];

/// REST implementation of the booking backend collaborators.
pub struct HttpBackend {
    base_url: String,
    session: Arc<dyn SessionContext>,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: String, session: Arc<dyn SessionContext>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.session.token() {
            Some(token) if !token.is_empty() => Ok(builder.bearer_auth(token)),
            _ => Err(ApiError::Unauthorized),
        }
    }

    async fn send_json(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let resp = self.authorized(builder)?.send().await?;
        let resp = check_status(resp).await?;
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => decode::opt_text(&value, ERROR_MESSAGE),
        Err(_) => {
            let trimmed = body.trim();
            (!trimmed.is_empty() && trimmed.len() <= 300).then(|| trimmed.to_string())
        }
    }
}

/// Bare arrays or `{data: [...]}`-style envelopes; a single object is
/// treated as a one-element list.
fn unwrap_list(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(_) => {
            let inner = decode::list(&body, ENVELOPE);
            if inner.is_empty() && decode::field(&body, ENVELOPE).is_none() {
                vec![body]
            } else {
                inner.to_vec()
            }
        }
        _ => Vec::new(),
    }
}

fn unwrap_record(body: Value) -> Value {
    match decode::field(&body, &["data"]) {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => body,
    }
}

#[async_trait]
impl AppointmentGateway for HttpBackend {
    async fn fetch_detail(&self, appointment_id: i64) -> Result<Value, ApiError> {
        let url = self.url(&format!("/appointments/{appointment_id}"));
        let body = self.send_json(self.client.get(url)).await?;
        Ok(unwrap_record(body))
    }

    async fn update_partial(&self, appointment_id: i64, changes: &ChangeSet) -> Result<(), ApiError> {
        let url = self.url(&format!("/appointments/{appointment_id}"));
        self.send_json(self.client.patch(url).json(changes)).await?;
        tracing::info!(appointment_id, fields = ?changes.changed_fields(), "appointment updated");
        Ok(())
    }
}

#[async_trait]
impl BarberDirectory for HttpBackend {
    async fn list_barbers(&self) -> Result<Vec<Value>, ApiError> {
        let body = self.send_json(self.client.get(self.url("/barbers"))).await?;
        Ok(unwrap_list(body))
    }
}

#[async_trait]
impl AvailabilitySource for HttpBackend {
    async fn fetch_availability(&self, request: &AvailabilityRequest) -> Result<Vec<RawSlot>, ApiError> {
        let builder = self.client.get(self.url("/availability")).query(request);
        let body = self.send_json(builder).await?;

        Ok(unwrap_list(body)
            .iter()
            .map(|entry| RawSlot {
                start: decode::opt_text(entry, SLOT_START),
                end: decode::opt_text(entry, SLOT_END),
            })
            .collect())
    }
}
