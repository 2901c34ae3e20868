//! One user's booking session for one restaurant.
//!
//! DESIGN
//! ======
//! `BookingSession` owns the grid, the hold and the query sequencer and is
//! the only place that mutates them, so the cross-cutting rules live here:
//! - a hold exists only for the selected table, and only while that table is
//!   available in the latest adopted result;
//! - changing date, time or guests releases the hold and clears the
//!   selection before a ticket for the new query is issued;
//! - expiry clears the selection and queues exactly one notice.
//!
//! The session is synchronous. `BookingFlow` feeds it network results and
//! countdown ticks.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tracing::{debug, info};

use super::grid::{TableGrid, TableView};
use super::hold::{HoldEvent, HoldGeneration, HoldPhase, HoldTimer};
use super::notice::{Notice, Notices};
use super::query::{AvailabilityQuery, QuerySequencer, QueryTicket};
use super::submit::ReservationConfirmation;
use crate::error::{BookingError, BookingResult};
use crate::net::types::{Id, ReservationRequest, Restaurant, Table};

pub const HOLD_EXPIRED_MESSAGE: &str = "Your table hold expired. Pick a table again to continue.";

/// Contact fields required before a reservation can be submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub phone: String,
    pub country: String,
    pub special_requests: String,
}

impl ContactForm {
    #[must_use]
    pub fn new(phone: impl Into<String>, country: impl Into<String>) -> Self {
        Self { phone: phone.into(), country: country.into(), special_requests: String::new() }
    }

    #[must_use]
    pub fn with_special_requests(mut self, text: impl Into<String>) -> Self {
        self.special_requests = text.into();
        self
    }

    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        if self.country.trim().is_empty() {
            missing.push("country");
        }
        missing
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RestaurantRef {
    id: Id,
    name: String,
}

#[derive(Clone, Debug, Default)]
pub struct BookingSession {
    restaurant: Option<RestaurantRef>,
    grid: TableGrid,
    hold: HoldTimer,
    sequencer: QuerySequencer,
    query: Option<AvailabilityQuery>,
    pending: Option<QueryTicket>,
    contact: ContactForm,
    notices: Notices,
}

impl BookingSession {
    #[must_use]
    pub fn new(hold_secs: u32) -> Self {
        Self { hold: HoldTimer::new(hold_secs), ..Self::default() }
    }

    // =========================================================================
    // RESTAURANT & QUERY
    // =========================================================================

    /// Install a restaurant and its table layout. Any query, selection and
    /// hold belong to the previous restaurant and are discarded.
    pub fn load_restaurant(&mut self, restaurant: Restaurant) {
        info!(restaurant_id = restaurant.id, tables = restaurant.tables.len(), "restaurant loaded");
        self.hold.release();
        self.sequencer.invalidate();
        self.query = None;
        self.pending = None;
        self.grid.set_layout(restaurant.tables);
        self.restaurant = Some(RestaurantRef { id: restaurant.id, name: restaurant.name });
    }

    #[must_use]
    pub fn restaurant_id(&self) -> Option<Id> {
        self.restaurant.as_ref().map(|r| r.id)
    }

    #[must_use]
    pub fn restaurant_name(&self) -> Option<&str> {
        self.restaurant.as_ref().map(|r| r.name.as_str())
    }

    /// Change the search parameters.
    ///
    /// On success the hold and selection are gone and the returned ticket is
    /// the only one whose result will be adopted.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] if no restaurant is loaded or the
    /// parameters are invalid. State is left unchanged in that case.
    pub fn set_params(
        &mut self,
        date: &str,
        time: &str,
        guests: u32,
    ) -> BookingResult<(QueryTicket, AvailabilityQuery)> {
        let restaurant_id = self
            .restaurant_id()
            .ok_or_else(|| BookingError::Validation("no restaurant selected".into()))?;
        let query = AvailabilityQuery::new(restaurant_id, date, time, guests);
        query.validate()?;

        self.hold.release();
        self.grid.clear_available();
        let ticket = self.sequencer.issue();
        info!(%ticket, date = %query.date, time = %query.time, guests, "availability query issued");
        self.query = Some(query.clone());
        self.pending = Some(ticket);
        Ok((ticket, query))
    }

    #[must_use]
    pub fn query(&self) -> Option<&AvailabilityQuery> {
        self.query.as_ref()
    }

    /// Whether the current query's result is still outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Adopt an availability result if `ticket` is still current.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StaleResponse`] when a newer query was issued;
    /// the result is discarded and state is unchanged.
    pub fn apply_availability(&mut self, ticket: QueryTicket, tables: &[Table]) -> BookingResult<usize> {
        if let Err(err) = self.sequencer.check(ticket) {
            debug!(%ticket, current = %self.sequencer.current(), "dropping stale availability");
            return Err(err);
        }
        self.grid.set_available(tables.iter().map(|t| t.id));
        self.pending = None;
        if self.hold.table_id() != self.grid.selected_id() {
            self.hold.release();
        }
        let available = self.grid.available_count();
        info!(%ticket, available, "availability applied");
        Ok(available)
    }

    /// Record a failed availability request for `ticket`.
    ///
    /// Failures for superseded tickets are ignored. Returns whether the
    /// failure was surfaced.
    pub fn fail_availability(&mut self, ticket: QueryTicket, err: &BookingError) -> bool {
        if !self.sequencer.is_current(ticket) {
            debug!(%ticket, error = %err, "ignoring failure for stale query");
            return false;
        }
        self.pending = None;
        self.notices.push_error(err);
        true
    }

    // =========================================================================
    // SELECTION & HOLD
    // =========================================================================

    #[must_use]
    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    #[must_use]
    pub fn tables(&self) -> Vec<TableView> {
        self.grid.project()
    }

    #[must_use]
    pub fn hold(&self) -> &HoldTimer {
        &self.hold
    }

    #[must_use]
    pub fn hold_phase(&self) -> HoldPhase {
        self.hold.phase()
    }

    #[must_use]
    pub fn selected_table(&self) -> Option<&Table> {
        self.grid.selected()
    }

    /// Select an available table and start its hold.
    ///
    /// Unavailable tables are ignored. Re-selecting the table already held
    /// keeps the running countdown.
    pub fn select_table(&mut self, table_id: Id) -> bool {
        if self.hold.table_id() == Some(table_id) {
            return true;
        }
        if !self.grid.select(table_id) {
            debug!(table_id, "ignoring selection of unavailable table");
            return false;
        }
        self.hold.start(table_id);
        info!(table_id, secs = self.hold.duration_secs(), "table held");
        true
    }

    /// Cancel the selection and its hold.
    pub fn deselect(&mut self) {
        self.grid.clear_selection();
        if self.hold.release() {
            info!("hold released by user");
        }
    }

    /// Advance the hold by one second on behalf of countdown `generation`.
    pub fn tick(&mut self, generation: HoldGeneration) -> Option<HoldEvent> {
        let event = self.hold.tick_for(generation)?;
        let HoldEvent::Expired { table_id } = event;
        self.grid.clear_selection();
        self.notices.push(Notice::info(HOLD_EXPIRED_MESSAGE));
        info!(table_id, "hold expired");
        Some(event)
    }

    // =========================================================================
    // CONTACT & SUBMISSION
    // =========================================================================

    #[must_use]
    pub fn contact(&self) -> &ContactForm {
        &self.contact
    }

    pub fn set_contact(&mut self, contact: ContactForm) {
        self.contact = contact;
    }

    /// Build the reservation request for the held table.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] when no hold is active or a
    /// required contact field is blank.
    pub fn reservation_request(&self) -> BookingResult<ReservationRequest> {
        let (Some(table_id), Some(query)) = (self.hold.table_id(), self.query.as_ref()) else {
            return Err(BookingError::Validation("select a table before reserving".into()));
        };
        if self.grid.selected_id() != Some(table_id) {
            return Err(BookingError::Validation("select a table before reserving".into()));
        }
        let missing = self.contact.missing_fields();
        if !missing.is_empty() {
            return Err(BookingError::Validation(format!("missing required fields: {}", missing.join(", "))));
        }
        Ok(ReservationRequest {
            restaurant_id: query.restaurant_id,
            table_id,
            date: query.date.clone(),
            time: query.time.clone(),
            guests: query.guests,
            phone: self.contact.phone.trim().to_owned(),
            country: self.contact.country.trim().to_owned(),
            special_requests: self.contact.special_requests.trim().to_owned(),
        })
    }

    /// The reservation was created: the hold is converted and ends here.
    pub fn complete_submission(&mut self, confirmation: &ReservationConfirmation) {
        self.hold.release();
        if let Some(id) = self.grid.selected_id() {
            self.grid.mark_unavailable(id);
        }
        self.grid.clear_selection();
        self.notices.push(Notice::info(format!(
            "Table {} reserved for {} at {}",
            confirmation.table, confirmation.date, confirmation.time
        )));
    }

    /// The reservation failed.
    ///
    /// A conflict means the table is gone for this query: it is marked
    /// unavailable and the hold ends. Every other failure keeps the hold
    /// (and its remaining time) so the user can retry.
    pub fn fail_submission(&mut self, err: &BookingError) {
        if let BookingError::Conflict(_) = err {
            if let Some(table_id) = self.hold.table_id() {
                self.grid.mark_unavailable(table_id);
            }
            self.hold.release();
            self.grid.clear_selection();
        }
        self.notices.push_error(err);
    }

    // =========================================================================
    // NOTICES
    // =========================================================================

    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Tear down: no hold, no selection, no pending query.
    pub fn reset(&mut self) {
        self.hold.release();
        self.grid.clear_available();
        self.sequencer.invalidate();
        self.pending = None;
    }
}
