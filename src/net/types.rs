//! Wire types for the restaurant booking REST API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Optional presentation
//! fields default to `None` so older records without them still decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Backend identifier for restaurants, tables and reservations.
pub type Id = i64;

/// A table in a restaurant's floor layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: Id,
    /// Display label such as `"A3"`.
    #[serde(alias = "table_number", deserialize_with = "label_from_any")]
    pub table_number: String,
    pub capacity: u32,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// A restaurant record, including its table layout when fetched by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// Response body of `GET /restaurants/{id}/availability`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub available_tables: Vec<Table>,
}

/// One hit of the express search: a restaurant with a bookable table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressMatch {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    pub available_table: Table,
}

/// Body of `POST /reservations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub restaurant_id: Id,
    pub table_id: Id,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub phone: String,
    pub country: String,
    #[serde(default)]
    pub special_requests: String,
}

/// A persisted reservation as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Id,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub restaurant_image: Option<String>,
    #[serde(default, alias = "table_number", deserialize_with = "optional_label_from_any")]
    pub table_number: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub guests: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Reservation {
    /// Status as shown to the user; `confirmed` is the common case.
    #[must_use]
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("confirmed")
    }

    /// `HH:MM` portion of the reservation time (the backend may send seconds).
    #[must_use]
    pub fn short_time(&self) -> &str {
        self.time.get(..5).unwrap_or(&self.time)
    }

    /// Scannable payload for this reservation.
    #[must_use]
    pub fn qr_payload(&self) -> QrPayload {
        QrPayload {
            id: Some(self.id),
            restaurant: self.restaurant_name.clone().unwrap_or_default(),
            table: self.table_number.clone().unwrap_or_default(),
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

/// JSON document encoded into a reservation QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub restaurant: String,
    pub table: String,
    pub date: String,
    pub time: String,
}

impl QrPayload {
    /// Encode as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Table labels arrive as strings (`"A3"`) or bare numbers (`12`).
fn label_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid table number: {other}"))),
    }
}

fn optional_label_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("invalid table number: {other}"))),
    }
}
