//! REST client for the restaurant booking backend.
//!
//! DESIGN
//! ======
//! [`ReservationApi`] is the only seam between the booking core and the
//! network. [`HttpApi`] implements it with `reqwest`; tests substitute mocks.
//! Bearer tokens are passed per call by the caller, never read from ambient
//! state.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses carry `{ "error": string }`. The message is surfaced
//! as-is, with `request failed: <status>` when the body is missing or not
//! JSON. 409 maps to `Conflict`, 401/403 to `Auth`. A 2xx body that fails
//! to decode is a `Network` error.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{
    AvailabilityResponse, ErrorBody, ExpressMatch, Id, Reservation, ReservationRequest, Restaurant, Table,
};
use crate::config::{ClientConfig, normalize_base_url};
use crate::error::{BookingError, BookingResult};
use crate::state::query::AvailabilityQuery;

/// Response of `POST /reservations`. Only the id is relied upon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservation {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Operations the booking core needs from the backend.
#[async_trait::async_trait]
pub trait ReservationApi: Send + Sync {
    /// `GET /restaurants`
    async fn list_restaurants(&self) -> BookingResult<Vec<Restaurant>>;

    /// `GET /restaurants/{id}` with the embedded table layout.
    async fn fetch_restaurant(&self, restaurant_id: Id) -> BookingResult<Restaurant>;

    /// `GET /restaurants/{id}/availability?date&time&guests`
    async fn check_availability(&self, query: &AvailabilityQuery) -> BookingResult<Vec<Table>>;

    /// `GET /search/availability?date&time&guests` across all restaurants.
    async fn search_express(&self, date: &str, time: &str, guests: u32) -> BookingResult<Vec<ExpressMatch>>;

    /// `POST /reservations`
    async fn create_reservation(&self, token: &str, request: &ReservationRequest)
    -> BookingResult<CreatedReservation>;

    /// `GET /reservations` for the signed-in user.
    async fn list_reservations(&self, token: &str) -> BookingResult<Vec<Reservation>>;

    /// `DELETE /reservations/{id}`
    async fn cancel_reservation(&self, token: &str, reservation_id: Id) -> BookingResult<()>;
}

/// `reqwest`-backed implementation of [`ReservationApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client with the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> BookingResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| BookingError::Config(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: normalize_base_url(&config.api_url) })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint onto the base URL, adding the leading `/` if absent.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> BookingResult<T> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request failed before response");
            BookingError::Network(e.to_string())
        })?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(error_from_response(status, &text));
        }
        serde_json::from_str(&text).map_err(|e| BookingError::Network(format!("invalid response body: {e}")))
    }

    async fn send_empty(&self, request: RequestBuilder) -> BookingResult<()> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request failed before response");
            BookingError::Network(e.to_string())
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &text))
    }
}

#[async_trait::async_trait]
impl ReservationApi for HttpApi {
    async fn list_restaurants(&self) -> BookingResult<Vec<Restaurant>> {
        debug!("listing restaurants");
        self.send_json(self.http.get(self.url("/restaurants"))).await
    }

    async fn fetch_restaurant(&self, restaurant_id: Id) -> BookingResult<Restaurant> {
        debug!(restaurant_id, "fetching restaurant");
        self.send_json(self.http.get(self.url(&format!("/restaurants/{restaurant_id}"))))
            .await
    }

    async fn check_availability(&self, query: &AvailabilityQuery) -> BookingResult<Vec<Table>> {
        query.validate()?;
        debug!(
            restaurant_id = query.restaurant_id,
            date = %query.date,
            time = %query.time,
            guests = query.guests,
            "checking availability"
        );
        let url = self.url(&format!("/restaurants/{}/availability", query.restaurant_id));
        let guests = query.guests.to_string();
        let request = self
            .http
            .get(url)
            .query(&[("date", query.date.as_str()), ("time", query.time.as_str()), ("guests", guests.as_str())]);
        let body: AvailabilityResponse = self.send_json(request).await?;
        Ok(body.available_tables)
    }

    async fn search_express(&self, date: &str, time: &str, guests: u32) -> BookingResult<Vec<ExpressMatch>> {
        debug!(date, time, guests, "express availability search");
        let guests = guests.to_string();
        let request = self
            .http
            .get(self.url("/search/availability"))
            .query(&[("date", date), ("time", time), ("guests", guests.as_str())]);
        self.send_json(request).await
    }

    async fn create_reservation(
        &self,
        token: &str,
        request: &ReservationRequest,
    ) -> BookingResult<CreatedReservation> {
        debug!(restaurant_id = request.restaurant_id, table_id = request.table_id, "creating reservation");
        let builder = self
            .http
            .post(self.url("/reservations"))
            .bearer_auth(token)
            .json(request);
        self.send_json(builder).await
    }

    async fn list_reservations(&self, token: &str) -> BookingResult<Vec<Reservation>> {
        debug!("listing reservations");
        self.send_json(self.http.get(self.url("/reservations")).bearer_auth(token))
            .await
    }

    async fn cancel_reservation(&self, token: &str, reservation_id: Id) -> BookingResult<()> {
        debug!(reservation_id, "cancelling reservation");
        let builder = self
            .http
            .delete(self.url(&format!("/reservations/{reservation_id}")))
            .bearer_auth(token);
        self.send_empty(builder).await
    }
}

/// Map a non-2xx status and raw body to a [`BookingError`].
#[must_use]
pub fn error_from_response(status: StatusCode, body: &str) -> BookingError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request failed: {}", status.as_u16()));
    warn!(status = status.as_u16(), %message, "backend returned error");
    match status {
        StatusCode::CONFLICT => BookingError::Conflict(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BookingError::Auth(message),
        _ => BookingError::Api { status: status.as_u16(), message },
    }
}
