use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode::{self, Aliases};

const ID: Aliases = &["id", "barber_id", "barberId", "user_id"];
const NAME: Aliases = &["name", "nombre", "full_name", "user.name"];
const PHONE: Aliases = &["phone", "telefono", "user.phone"];
const EMAIL: Aliases = &["email", "correo", "user.email"];
const SPECIALTY: Aliases = &["specialty", "especialidad"];
const RATING: Aliases = &["rating", "average_rating", "calificacion"];
const ACTIVE: Aliases = &["active", "is_active", "activo"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barber {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialty: String,
    pub rating: f64,
    pub active: bool,
}

impl Barber {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone: String::new(),
            email: String::new(),
            specialty: String::new(),
            rating: 0.0,
            active: true,
        }
    }
}

pub fn normalize_barber(raw: &Value) -> Barber {
    Barber {
        id: decode::integer(raw, ID),
        name: decode::text(raw, NAME),
        phone: decode::text(raw, PHONE),
        email: decode::text(raw, EMAIL),
        specialty: decode::text(raw, SPECIALTY),
        rating: decode::number(raw, RATING),
        active: decode::field(raw, ACTIVE).is_none() || decode::flag(raw, ACTIVE),
    }
}

/// Caller-supplied barbers first, then fetched ones not already present.
/// On an id collision the supplied entry wins.
pub fn merge_barbers(supplied: &[Barber], fetched: &[Barber]) -> Vec<Barber> {
    let mut merged: Vec<Barber> = Vec::with_capacity(supplied.len() + fetched.len());
    for barber in supplied.iter().chain(fetched) {
        if !merged.iter().any(|b| b.id == barber.id) {
            merged.push(barber.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_barber_aliases() {
        let barber = normalize_barber(&json!({
            "barber_id": "5",
            "nombre": "Pedro",
            "rating": "4.5",
            "activo": false
        }));
        assert_eq!(barber.id, 5);
        assert_eq!(barber.name, "Pedro");
        assert_eq!(barber.rating, 4.5);
        assert!(!barber.active);
    }

    #[test]
    fn test_normalize_barber_defaults() {
        let barber = normalize_barber(&json!({}));
        assert_eq!(barber.id, 0);
        assert_eq!(barber.name, "");
        assert_eq!(barber.rating, 0.0);
        assert!(barber.active);
    }

    #[test]
    fn test_merge_dedupes_and_prefers_supplied() {
        let supplied = vec![Barber::new(1, "Ana (local)"), Barber::new(2, "Luis")];
        let fetched = vec![Barber::new(1, "Ana"), Barber::new(3, "Pedro"), Barber::new(3, "Pedro")];
        let merged = merge_barbers(&supplied, &fetched);
        let ids: Vec<i64> = merged.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(merged[0].name, "Ana (local)");
    }
}
