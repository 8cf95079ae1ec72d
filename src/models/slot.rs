use serde::{Deserialize, Serialize};

use super::time::{to_display_range, CanonicalTime};

/// A bookable window. Only constructible with `end` after `start`, and the
/// duration is always derived from the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    start: CanonicalTime,
    end: CanonicalTime,
    duration_min: i64,
}

impl TimeSlot {
    pub fn new(start: CanonicalTime, end: CanonicalTime) -> Option<Self> {
        if end <= start {
            return None;
        }
        Some(Self {
            start,
            end,
            duration_min: end.minutes_since_midnight() - start.minutes_since_midnight(),
        })
    }

    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Self::new(
            CanonicalTime::parse_lenient(start)?,
            CanonicalTime::parse_lenient(end)?,
        )
    }

    pub fn start(&self) -> CanonicalTime {
        self.start
    }

    pub fn end(&self) -> CanonicalTime {
        self.end
    }

    pub fn duration_min(&self) -> i64 {
        self.duration_min
    }

    pub fn label(&self) -> String {
        to_display_range(&self.start, Some(&self.end))
    }
}

#[derive(Deserialize)]
struct SlotWire {
    start: CanonicalTime,
    end: CanonicalTime,
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = SlotWire::deserialize(deserializer)?;
        TimeSlot::new(wire.start, wire.end)
            .ok_or_else(|| serde::de::Error::custom("slot end must be after start"))
    }
}

/// Raw `{start, end}` pair as the availability backend sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSlot {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RawSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    pub fn to_slot(&self) -> Option<TimeSlot> {
        TimeSlot::parse(self.start.as_deref()?, self.end.as_deref()?)
    }
}
