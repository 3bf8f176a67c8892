//! Booking domain client
//!
//! Models for the booking API and a client expressing each domain
//! operation as one execute call. Reads are unauthenticated and typed;
//! writes require a token and surface the raw [`ExecutionResult`] so
//! scenario steps can assert status and elapsed time independently.

use crate::client::BookerClient;
use crate::error::Result;
use crate::http::{ExecutionResult, RequestSpec};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Check-in/check-out window of a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
}

/// A booking as the API represents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

/// Response to a booking creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub bookingid: i64,
    pub booking: Booking,
}

/// One entry of the booking id listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingId {
    pub bookingid: i64,
}

/// Domain client for `/booking` endpoints
#[derive(Debug)]
pub struct BookingClient {
    client: BookerClient,
}

impl BookingClient {
    /// Wrap a base client
    pub fn new(client: BookerClient) -> Self {
        Self { client }
    }

    /// The underlying base client
    pub fn inner(&self) -> &BookerClient {
        &self.client
    }

    /// `POST /booking` — create a booking (no auth required)
    pub async fn create_booking(&self, booking: &Booking) -> Result<BookingResponse> {
        let spec = RequestSpec::post("/booking").json(serde_json::to_value(booking)?);
        self.client.execute_json(&spec, "create booking").await
    }

    /// `GET /booking/{id}` — fetch one booking, typed
    pub async fn get_booking(&self, booking_id: i64) -> Result<Booking> {
        let spec = RequestSpec::get(format!("/booking/{booking_id}"));
        self.client
            .execute_json(&spec, &format!("get booking {booking_id}"))
            .await
    }

    /// `GET /booking/{id}` — fetch one booking as a raw result.
    ///
    /// Lets steps assert on a client-error status (e.g. 404 after delete)
    /// without a typed failure.
    pub async fn get_booking_raw(&self, booking_id: i64) -> Result<ExecutionResult> {
        self.client
            .execute(&RequestSpec::get(format!("/booking/{booking_id}")))
            .await
    }

    /// `GET /booking` — list all booking ids
    pub async fn get_booking_ids(&self) -> Result<Vec<BookingId>> {
        let spec = RequestSpec::get("/booking");
        self.client.execute_json(&spec, "list booking ids").await
    }

    /// `PUT /booking/{id}` — full update (auth required)
    pub async fn update_booking(
        &self,
        booking_id: i64,
        booking: &Booking,
    ) -> Result<ExecutionResult> {
        let spec = RequestSpec::put(format!("/booking/{booking_id}"))
            .json(serde_json::to_value(booking)?)
            .with_auth();
        self.client.execute(&spec).await
    }

    /// `PATCH /booking/{id}` — partial update (auth required)
    pub async fn partial_update_booking(
        &self,
        booking_id: i64,
        patch: Value,
    ) -> Result<ExecutionResult> {
        let spec = RequestSpec::patch(format!("/booking/{booking_id}"))
            .json(patch)
            .with_auth();
        self.client.execute(&spec).await
    }

    /// `DELETE /booking/{id}` — delete (auth required)
    pub async fn delete_booking(&self, booking_id: i64) -> Result<ExecutionResult> {
        let spec = RequestSpec::delete(format!("/booking/{booking_id}")).with_auth();
        self.client.execute(&spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_booking() -> Booking {
        Booking {
            firstname: "Jim".to_string(),
            lastname: "Brown".to_string(),
            totalprice: 111,
            depositpaid: true,
            bookingdates: BookingDates {
                checkin: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                checkout: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            },
            additionalneeds: Some("Breakfast".to_string()),
        }
    }

    #[test]
    fn test_booking_serializes_with_api_field_names() {
        let value = serde_json::to_value(sample_booking()).unwrap();
        assert_eq!(
            value,
            json!({
                "firstname": "Jim",
                "lastname": "Brown",
                "totalprice": 111,
                "depositpaid": true,
                "bookingdates": {
                    "checkin": "2026-01-01",
                    "checkout": "2026-01-05"
                },
                "additionalneeds": "Breakfast"
            })
        );
    }

    #[test]
    fn test_booking_omits_absent_additionalneeds() {
        let mut booking = sample_booking();
        booking.additionalneeds = None;
        let value = serde_json::to_value(booking).unwrap();
        assert!(value.get("additionalneeds").is_none());
    }

    #[test]
    fn test_booking_response_round_trip() {
        let body = json!({
            "bookingid": 42,
            "booking": {
                "firstname": "Jim",
                "lastname": "Brown",
                "totalprice": 111,
                "depositpaid": true,
                "bookingdates": {
                    "checkin": "2026-01-01",
                    "checkout": "2026-01-05"
                },
                "additionalneeds": "Breakfast"
            }
        });

        let parsed: BookingResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.bookingid, 42);
        assert_eq!(parsed.booking, sample_booking());
    }
}
