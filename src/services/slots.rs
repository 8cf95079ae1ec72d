use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::TimeSlot;
use crate::services::api::{AvailabilityRequest, AvailabilitySource};
use crate::session::SessionContext;

pub const MIN_SLOT_DURATION_MIN: i64 = 5;

/// The three inputs a resolution depends on. Any change is a new query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotQuery {
    barber_id: i64,
    date: NaiveDate,
    duration_min: i64,
}

impl SlotQuery {
    /// Durations under five minutes are raised to five.
    pub fn new(barber_id: i64, date: NaiveDate, duration_min: i64) -> Self {
        Self {
            barber_id,
            date,
            duration_min: duration_min.max(MIN_SLOT_DURATION_MIN),
        }
    }

    pub fn barber_id(&self) -> i64 {
        self.barber_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn duration_min(&self) -> i64 {
        self.duration_min
    }
}

#[derive(Clone)]
pub struct SlotResolver {
    source: Arc<dyn AvailabilitySource>,
    session: Arc<dyn SessionContext>,
    generation: Arc<AtomicU64>,
}

impl SlotResolver {
    pub fn new(source: Arc<dyn AvailabilitySource>, session: Arc<dyn SessionContext>) -> Self {
        Self {
            source,
            session,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Bookable slots for the query. Degrades to an empty list when the
    /// session has no token or the backend call fails.
    pub async fn resolve(&self, query: &SlotQuery) -> Vec<TimeSlot> {
        if !self.session.is_authenticated() {
            tracing::warn!(barber_id = query.barber_id, "no session token, skipping slot lookup");
            return Vec::new();
        }

        let request = AvailabilityRequest {
            barber_id: query.barber_id,
            date: query.date,
            duration: query.duration_min,
        };

        let raw = match self.source.fetch_availability(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, barber_id = query.barber_id, date = %query.date, "availability lookup failed");
                return Vec::new();
            }
        };

        let total = raw.len();
        let slots: Vec<TimeSlot> = raw.iter().filter_map(|r| r.to_slot()).collect();
        if slots.len() < total {
            tracing::warn!(
                dropped = total - slots.len(),
                barber_id = query.barber_id,
                "discarded unparseable availability entries"
            );
        }
        slots
    }

    /// Like `resolve`, but yields `None` if another `resolve_latest` call was
    /// made on this resolver (or a clone) before this one completed. The
    /// request is numbered when this method is called, not when the future
    /// is first polled.
    pub fn resolve_latest(&self, query: SlotQuery) -> impl Future<Output = Option<Vec<TimeSlot>>> + Send + 'static {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let resolver = self.clone();
        async move {
            let slots = resolver.resolve(&query).await;
            if resolver.generation.load(Ordering::SeqCst) != ticket {
                tracing::debug!(barber_id = query.barber_id, date = %query.date, "discarding superseded slot result");
                return None;
            }
            Some(slots)
        }
    }
}
