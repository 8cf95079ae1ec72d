use tokio::sync::broadcast;

/// Cached queries screen code may hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Appointment(i64),
    Appointments,
    BarberAgenda(i64),
    ClientAppointments(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Invalidate(QueryKey),
    Refetch(QueryKey),
}

pub trait QueryInvalidator: Send + Sync {
    fn invalidate(&self, key: QueryKey);
    fn refetch(&self, key: QueryKey);
}

/// Publishes cache events to whoever subscribed; events are dropped when
/// nobody is listening.
#[derive(Clone)]
pub struct BroadcastInvalidator {
    tx: broadcast::Sender<CacheEvent>,
}

impl BroadcastInvalidator {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }

    fn publish(&self, event: CacheEvent) {
        tracing::debug!(?event, "cache event");
        let _ = self.tx.send(event);
    }
}

impl Default for BroadcastInvalidator {
    fn default() -> Self {
        Self::new(64)
    }
}

impl QueryInvalidator for BroadcastInvalidator {
    fn invalidate(&self, key: QueryKey) {
        self.publish(CacheEvent::Invalidate(key));
    }

    fn refetch(&self, key: QueryKey) {
        self.publish(CacheEvent::Refetch(key));
    }
}
