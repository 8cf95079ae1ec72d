/// Read-only view of the signed-in user. Injected wherever a call needs the
/// token or the current barber/client identity.
pub trait SessionContext: Send + Sync {
    fn token(&self) -> Option<String>;
    fn current_barber_id(&self) -> Option<i64>;
    fn current_client_id(&self) -> Option<i64>;

    fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
    barber_id: Option<i64>,
    client_id: Option<i64>,
}

impl StaticSession {
    pub fn new(token: Option<String>, barber_id: Option<i64>, client_id: Option<i64>) -> Self {
        Self {
            token,
            barber_id,
            client_id,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionContext for StaticSession {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn current_barber_id(&self) -> Option<i64> {
        self.barber_id
    }

    fn current_client_id(&self) -> Option<i64> {
        self.client_id
    }
}
