use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode::{self, Aliases};

const ID: Aliases = &["id", "review_id"];
const APPOINTMENT_ID: Aliases = &["appointment_id", "appointmentId", "appointment.id"];
const BARBER_ID: Aliases = &["barber_id", "barberId", "barber.id"];
const CLIENT_NAME: Aliases = &["client_name", "client.name", "cliente_nombre"];
const RATING: Aliases = &["rating", "stars", "calificacion", "puntuacion"];
const COMMENT: Aliases = &["comment", "comentario", "text"];
const CREATED_AT: Aliases = &["created_at", "createdAt", "fecha"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub appointment_id: i64,
    pub barber_id: i64,
    pub client_name: String,
    /// Stars, 0 to 5.
    pub rating: i64,
    pub comment: String,
    pub created_at: String,
}

pub fn normalize_review(raw: &Value) -> Review {
    Review {
        id: decode::integer(raw, ID),
        appointment_id: decode::integer(raw, APPOINTMENT_ID),
        barber_id: decode::integer(raw, BARBER_ID),
        client_name: decode::text(raw, CLIENT_NAME),
        rating: decode::integer(raw, RATING).clamp(0, 5),
        comment: decode::text(raw, COMMENT),
        created_at: decode::text(raw, CREATED_AT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_review() {
        let review = normalize_review(&json!({
            "id": 1,
            "appointment_id": 12,
            "calificacion": "4",
            "comentario": "Excelente corte"
        }));
        assert_eq!(review.rating, 4);
        assert_eq!(review.comment, "Excelente corte");
        assert_eq!(review.barber_id, 0);
    }

    #[test]
    fn test_rating_out_of_range() {
        assert_eq!(normalize_review(&json!({"rating": 9})).rating, 5);
        assert_eq!(normalize_review(&json!({"rating": -2})).rating, 0);
        assert_eq!(normalize_review(&json!({})).rating, 0);
    }
}
