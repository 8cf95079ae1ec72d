use std::env;
use std::time::Duration;

use crate::session::StaticSession;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub barber_id: Option<i64>,
    pub client_id: Option<i64>,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("BARBERSHOP_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            api_token: env::var("BARBERSHOP_API_TOKEN").unwrap_or_default(),
            barber_id: env::var("BARBERSHOP_BARBER_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
            client_id: env::var("BARBERSHOP_CLIENT_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
            request_timeout: Duration::from_secs(
                env::var("BARBERSHOP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15),
            ),
        }
    }

    /// An empty token yields a session without credentials.
    pub fn session(&self) -> StaticSession {
        let token = (!self.api_token.is_empty()).then(|| self.api_token.clone());
        StaticSession::new(token, self.barber_id, self.client_id)
    }
}
