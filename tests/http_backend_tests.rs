use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use barbershop::errors::ApiError;
use barbershop::models::{normalize_appointment, AppointmentStatus, ChangeSet, RawSlot, TimeSlot};
use barbershop::services::api::http::HttpBackend;
use barbershop::services::api::{
    AppointmentGateway, AvailabilityRequest, AvailabilitySource, BarberDirectory,
};
use barbershop::services::slots::{SlotQuery, SlotResolver};
use barbershop::session::{SessionContext, StaticSession};

fn session() -> Arc<dyn SessionContext> {
    Arc::new(StaticSession::new(Some("secret".into()), None, None))
}

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(format!("{}/api/", server.uri()), session(), Duration::from_secs(5)).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

#[tokio::test]
async fn test_fetch_detail_sends_bearer_and_unwraps_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments/42"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 42,
                "date": "2025-03-10",
                "start_time": "09:00",
                "end_time": "09:30",
                "status": "pendiente",
                "barber": {"name": "Luis"}
            }
        })))
        .mount(&server)
        .await;

    let detail = backend(&server).fetch_detail(42).await.unwrap();
    let appt = normalize_appointment(&detail);
    assert_eq!(appt.id, 42);
    assert_eq!(appt.status, AppointmentStatus::Booked);
    assert_eq!(appt.barber_name, "Luis");
}

#[tokio::test]
async fn test_fetch_detail_not_found_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments/7"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Cita no encontrada"})),
        )
        .mount(&server)
        .await;

    match backend(&server).fetch_detail(7).await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message.as_deref(), Some("Cita no encontrada"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/barbers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = backend(&server).list_barbers().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_missing_token_never_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let anonymous = HttpBackend::new(
        server.uri(),
        Arc::new(StaticSession::anonymous()),
        Duration::from_secs(5),
    )
    .unwrap();
    let err = anonymous.list_barbers().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn test_list_barbers_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/barbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Ana"},
            {"id": 2, "name": "Luis"}
        ])))
        .mount(&server)
        .await;

    let barbers = backend(&server).list_barbers().await.unwrap();
    assert_eq!(barbers.len(), 2);
}

#[tokio::test]
async fn test_availability_query_and_tolerant_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/availability"))
        .and(query_param("barber_id", "3"))
        .and(query_param("date", "2025-03-10"))
        .and(query_param("duration", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "slots": [
                {"start": "09:00", "end": "09:30"},
                {"start_time": "2025-03-10T10:00:00", "end_time": "2025-03-10T10:30:00"},
                {"hora_inicio": "11:00"}
            ]
        })))
        .mount(&server)
        .await;

    let request = AvailabilityRequest {
        barber_id: 3,
        date: date(),
        duration: 30,
    };
    let raw = backend(&server).fetch_availability(&request).await.unwrap();
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[0], RawSlot::new("09:00", "09:30"));
    assert_eq!(raw[2].end, None);
}

#[tokio::test]
async fn test_resolver_over_http_drops_bad_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"start": "09:00", "end": "09:30"},
            {"start": "10:00", "end": "09:30"},
            {"start": "??", "end": "11:00"}
        ])))
        .mount(&server)
        .await;

    let resolver = SlotResolver::new(Arc::new(backend(&server)), session());
    let slots = resolver.resolve(&SlotQuery::new(3, date(), 30)).await;
    assert_eq!(slots, vec![TimeSlot::parse("09:00", "09:30").unwrap()]);
}

#[tokio::test]
async fn test_resolver_over_http_server_error_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/availability"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = SlotResolver::new(Arc::new(backend(&server)), session());
    assert!(resolver.resolve(&SlotQuery::new(3, date(), 30)).await.is_empty());
}

#[tokio::test]
async fn test_update_partial_sends_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/appointments/42"))
        .and(body_json(json!({"barber_id": 5})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let changes = ChangeSet {
        barber_id: Some(5),
        ..ChangeSet::default()
    };
    backend(&server).update_partial(42, &changes).await.unwrap();
}

#[tokio::test]
async fn test_update_partial_rejection_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/appointments/42"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "Horario no disponible"})),
        )
        .mount(&server)
        .await;

    let changes = ChangeSet {
        barber_id: Some(5),
        ..ChangeSet::default()
    };
    let err = backend(&server).update_partial(42, &changes).await.unwrap_err();
    assert_eq!(err.user_message(), "Horario no disponible");
}
