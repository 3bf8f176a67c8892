//! Integration tests using a mock booking API
//!
//! Exercise the full flow the step definitions rely on: lazy token
//! acquisition, the retry loop, and the create/get/update/delete
//! scenario with per-step results.

use booker_client::{
    BookerClient, Booking, BookingClient, BookingDates, ClientConfig, Error, RequestSpec,
};
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder(server.uri())
        .credentials("admin", "password123")
        .max_attempts(3)
        .base_delay(Duration::from_millis(10))
        .build()
        .unwrap()
}

fn sample_booking() -> Booking {
    Booking {
        firstname: "Sally".to_string(),
        lastname: "Brown".to_string(),
        totalprice: 111,
        depositpaid: true,
        bookingdates: BookingDates {
            checkin: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            checkout: NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(),
        },
        additionalneeds: Some("Breakfast".to_string()),
    }
}

fn booking_body() -> serde_json::Value {
    json!({
        "firstname": "Sally",
        "lastname": "Brown",
        "totalprice": 111,
        "depositpaid": true,
        "bookingdates": {
            "checkin": "2026-02-01",
            "checkout": "2026-02-05"
        },
        "additionalneeds": "Breakfast"
    })
}

async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .mount(server)
        .await;
}

// ============================================================================
// Health check
// ============================================================================

#[tokio::test]
async fn ping_succeeds_without_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(201).set_body_string("Created"))
        .expect(1)
        .mount(&server)
        .await;

    let client = BookerClient::new(test_config(&server)).unwrap();
    let result = client.ping().await.unwrap();

    assert_eq!(result.status.as_u16(), 201);
    assert_eq!(result.attempts, 1);
    // No token exchange happened
    assert_eq!(client.token().await, None);
}

// ============================================================================
// Booking scenario
// ============================================================================

#[tokio::test]
async fn booking_lifecycle_scenario() {
    let server = MockServer::start().await;
    mount_auth(&server).await;

    Mock::given(method("POST"))
        .and(path("/booking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bookingid": 17,
            "booking": booking_body()
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/booking/17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(booking_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut updated_body = booking_body();
    updated_body["totalprice"] = json!(222);
    Mock::given(method("PUT"))
        .and(path("/booking/17"))
        .and(header("Cookie", "token=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated_body))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/booking/17"))
        .and(header("Cookie", "token=abc123"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = BookingClient::new(BookerClient::new(test_config(&server)).unwrap());

    // create
    let created = client.create_booking(&sample_booking()).await.unwrap();
    assert_eq!(created.bookingid, 17);
    assert_eq!(created.booking, sample_booking());

    // get
    let fetched = client.get_booking(17).await.unwrap();
    assert_eq!(fetched, sample_booking());

    // update (first authenticated step triggers the token exchange)
    let mut updated = sample_booking();
    updated.totalprice = 222;
    let update_result = client.update_booking(17, &updated).await.unwrap();
    assert!(update_result.is_success());
    assert_eq!(update_result.attempts, 1);
    assert!(update_result.elapsed > Duration::ZERO);

    // delete
    let delete_result = client.delete_booking(17).await.unwrap();
    assert_eq!(delete_result.status.as_u16(), 201);
    assert!(delete_result.elapsed > Duration::ZERO);
}

#[tokio::test]
async fn get_after_delete_returns_client_error_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/booking/17"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = BookingClient::new(BookerClient::new(test_config(&server)).unwrap());

    // A 404 is a result, not an error, and is not retried
    let result = client.get_booking_raw(17).await.unwrap();
    assert!(result.is_client_error());
    assert_eq!(result.status.as_u16(), 404);
    assert_eq!(result.attempts, 1);
}

#[tokio::test]
async fn create_booking_sends_exact_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/booking"))
        .and(body_json(booking_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bookingid": 1,
            "booking": booking_body()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BookingClient::new(BookerClient::new(test_config(&server)).unwrap());
    client.create_booking(&sample_booking()).await.unwrap();
}

// ============================================================================
// Retry behavior end to end
// ============================================================================

#[tokio::test]
async fn transient_503s_are_retried_through_the_domain_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/booking/5"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/booking/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(booking_body()))
        .mount(&server)
        .await;

    let client = BookingClient::new(BookerClient::new(test_config(&server)).unwrap());
    let booking = client.get_booking(5).await.unwrap();

    assert_eq!(booking.firstname, "Sally");
}

#[tokio::test]
async fn exhausted_retries_surface_request_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/booking/5"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = BookingClient::new(BookerClient::new(test_config(&server)).unwrap());
    let err = client.get_booking(5).await.unwrap_err();

    assert!(matches!(
        err,
        Error::RequestFailed {
            attempts: 3,
            status: Some(500),
            ..
        }
    ));
}

// ============================================================================
// Token lifecycle
// ============================================================================

#[tokio::test]
async fn explicit_authenticate_then_writes_reuse_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc123"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/booking/3"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = BookerClient::new(test_config(&server)).unwrap();

    let token = client.authenticate().await.unwrap();
    assert_eq!(token, "abc123");
    assert_eq!(client.token().await.as_deref(), Some("abc123"));

    // Cached token is reused; /auth is not called again
    let result = client
        .execute(&RequestSpec::delete("/booking/3").with_auth())
        .await
        .unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn expired_token_triggers_fresh_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "renewed"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/booking/3"))
        .and(header("Authorization", "Bearer renewed"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = BookerClient::new(test_config(&server)).unwrap();

    // Seed a token that is already expired
    client.set_token("stale", Duration::from_secs(0)).await;

    let result = client
        .execute(&RequestSpec::delete("/booking/3").with_auth())
        .await
        .unwrap();
    assert!(result.is_success());
    assert_eq!(client.token().await.as_deref(), Some("renewed"));
}
