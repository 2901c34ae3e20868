//! Reservation submission for a held table.
//!
//! ERROR HANDLING
//! ==============
//! Preconditions (active hold, contact fields, bearer token) are checked
//! before any request is sent. Whatever the outcome, the session is told:
//! success ends the hold, a conflict ends it and marks the table taken, any
//! other failure keeps the hold running so the user can retry while time
//! remains.

#[cfg(test)]
#[path = "submit_test.rs"]
mod submit_test;

use std::sync::Arc;

use tracing::{info, warn};

use super::session::BookingSession;
use crate::auth::TokenProvider;
use crate::error::{BookingError, BookingResult};
use crate::net::api::ReservationApi;
use crate::net::types::{Id, QrPayload, Reservation};

/// What the user gets after a successful reservation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationConfirmation {
    pub reservation_id: Option<Id>,
    pub restaurant: String,
    pub table: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
}

impl ReservationConfirmation {
    #[must_use]
    pub fn qr_payload(&self) -> QrPayload {
        QrPayload {
            id: self.reservation_id,
            restaurant: self.restaurant.clone(),
            table: self.table.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ReservationSubmitter {
    api: Arc<dyn ReservationApi>,
    tokens: Arc<dyn TokenProvider>,
}

impl ReservationSubmitter {
    #[must_use]
    pub fn new(api: Arc<dyn ReservationApi>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { api, tokens }
    }

    /// Submit a reservation for the session's held table.
    ///
    /// # Errors
    ///
    /// - [`BookingError::Validation`] when there is no hold or contact data is missing
    /// - [`BookingError::Auth`] when no token is available or the backend rejects it
    /// - [`BookingError::Conflict`] when the table was taken server-side
    /// - [`BookingError::Network`] / [`BookingError::Api`] for other failures
    pub async fn submit(&self, session: &mut BookingSession) -> BookingResult<ReservationConfirmation> {
        let request = match session.reservation_request() {
            Ok(request) => request,
            Err(err) => {
                session.fail_submission(&err);
                return Err(err);
            }
        };
        let Some(token) = self.tokens.bearer_token() else {
            let err = BookingError::Auth("sign in to reserve a table".into());
            session.fail_submission(&err);
            return Err(err);
        };
        let table = session
            .selected_table()
            .map(|t| t.table_number.clone())
            .unwrap_or_else(|| request.table_id.to_string());
        let restaurant = session.restaurant_name().unwrap_or_default().to_owned();

        match self.api.create_reservation(&token, &request).await {
            Ok(created) => {
                let confirmation = ReservationConfirmation {
                    reservation_id: created.id,
                    restaurant,
                    table,
                    date: request.date,
                    time: request.time,
                    guests: request.guests,
                };
                info!(
                    reservation_id = ?confirmation.reservation_id,
                    table = %confirmation.table,
                    "reservation confirmed"
                );
                session.complete_submission(&confirmation);
                Ok(confirmation)
            }
            Err(err) => {
                warn!(error = %err, code = err.error_code(), "reservation failed");
                session.fail_submission(&err);
                Err(err)
            }
        }
    }

    /// Cancel an existing reservation.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Auth`] without a token, otherwise whatever the
    /// backend reports.
    pub async fn cancel(&self, reservation_id: Id) -> BookingResult<()> {
        let token = self
            .tokens
            .bearer_token()
            .ok_or_else(|| BookingError::Auth("sign in to manage reservations".into()))?;
        self.api.cancel_reservation(&token, reservation_id).await?;
        info!(reservation_id, "reservation cancelled");
        Ok(())
    }

    /// The signed-in user's reservations.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Auth`] without a token, otherwise whatever the
    /// backend reports.
    pub async fn list(&self) -> BookingResult<Vec<Reservation>> {
        let token = self
            .tokens
            .bearer_token()
            .ok_or_else(|| BookingError::Auth("sign in to see your reservations".into()))?;
        self.api.list_reservations(&token).await
    }
}
