use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::{parse_calendar_date, CanonicalTime};

/// Schedule fields of an appointment as they arrived, before
/// canonicalization. Used for both the original and the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleFields {
    pub barber_id: Option<i64>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ScheduleFields {
    fn canonical_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_calendar_date)
    }

    fn canonical_start(&self) -> Option<CanonicalTime> {
        self.start.as_deref().and_then(CanonicalTime::parse_lenient)
    }

    fn canonical_end(&self) -> Option<CanonicalTime> {
        self.end.as_deref().and_then(CanonicalTime::parse_lenient)
    }
}

/// Partial update for one appointment. A field is present only when the
/// draft's canonical value differs from the original's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barber_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<CanonicalTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<CanonicalTime>,
}

/// Draft value if it is known and differs from the original.
fn changed<T: PartialEq>(original: Option<T>, draft: Option<T>) -> Option<T> {
    match draft {
        Some(value) if original.as_ref() != Some(&value) => Some(value),
        _ => None,
    }
}

impl ChangeSet {
    pub fn compute(original: &ScheduleFields, draft: &ScheduleFields) -> Self {
        Self {
            barber_id: changed(original.barber_id, draft.barber_id),
            date: changed(original.canonical_date(), draft.canonical_date()),
            start: changed(original.canonical_start(), draft.canonical_start()),
            end: changed(original.canonical_end(), draft.canonical_end()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.barber_id.is_none() && self.date.is_none() && self.start.is_none() && self.end.is_none()
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("barber_id", self.barber_id.is_some()),
            ("date", self.date.is_some()),
            ("start", self.start.is_some()),
            ("end", self.end.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn original() -> ScheduleFields {
        ScheduleFields {
            barber_id: Some(3),
            date: Some("2025-03-10".to_string()),
            start: Some("09:00:00".to_string()),
            end: Some("09:30:00".to_string()),
        }
    }

    #[test]
    fn test_equal_after_canonicalization_is_empty() {
        let draft = ScheduleFields {
            start: Some("09:00".to_string()),
            ..original()
        };
        let cs = ChangeSet::compute(&original(), &draft);
        assert!(cs.is_empty());
        assert_eq!(serde_json::to_value(&cs).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_only_barber_changed() {
        let draft = ScheduleFields {
            barber_id: Some(5),
            ..original()
        };
        let cs = ChangeSet::compute(&original(), &draft);
        assert_eq!(
            cs,
            ChangeSet {
                barber_id: Some(5),
                ..ChangeSet::default()
            }
        );
        assert_eq!(
            serde_json::to_value(&cs).unwrap(),
            serde_json::json!({"barber_id": 5})
        );
    }

    #[test]
    fn test_time_and_date_change() {
        let draft = ScheduleFields {
            date: Some("2025-03-11T00:00:00".to_string()),
            start: Some("10:00".to_string()),
            end: Some("10:30".to_string()),
            ..original()
        };
        let cs = ChangeSet::compute(&original(), &draft);
        assert_eq!(cs.changed_fields(), vec!["date", "start", "end"]);
        assert_eq!(
            serde_json::to_value(&cs).unwrap(),
            serde_json::json!({"date": "2025-03-11", "start": "10:00:00", "end": "10:30:00"})
        );
    }

    #[test]
    fn test_unparseable_draft_is_never_sent() {
        let draft = ScheduleFields {
            start: Some("??".to_string()),
            date: None,
            ..original()
        };
        assert!(ChangeSet::compute(&original(), &draft).is_empty());
    }

    #[test]
    fn test_unknown_original_counts_as_change() {
        let orig = ScheduleFields {
            start: Some("garbled".to_string()),
            ..original()
        };
        let cs = ChangeSet::compute(&orig, &original());
        assert_eq!(cs.changed_fields(), vec!["start"]);
    }
}
