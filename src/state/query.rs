//! Availability query parameters and last-query-wins sequencing.
//!
//! DESIGN
//! ======
//! Every parameter change issues a new [`QueryTicket`] from a monotonically
//! increasing counter. Responses carry the ticket they were issued under and
//! are adopted only if that ticket is still current at resolution time, so a
//! slow response for old parameters can never overwrite a newer result.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use std::fmt;

use time::macros::format_description;
use time::{Date, Time};

use crate::error::{BookingError, BookingResult};
use crate::net::types::Id;

/// The user's search: which restaurant, when, and for how many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub restaurant_id: Id,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour clock.
    pub time: String,
    pub guests: u32,
}

impl AvailabilityQuery {
    #[must_use]
    pub fn new(restaurant_id: Id, date: impl Into<String>, time: impl Into<String>, guests: u32) -> Self {
        Self { restaurant_id, date: date.into().trim().to_owned(), time: time.into().trim().to_owned(), guests }
    }

    /// Check the query locally. Nothing is sent when this fails.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] when the date or time is missing
    /// or malformed, or the party size is zero.
    pub fn validate(&self) -> BookingResult<()> {
        parse_date(&self.date)?;
        parse_time(&self.time)?;
        if self.guests < 1 {
            return Err(BookingError::Validation("guests must be at least 1".into()));
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] if the value is empty or malformed.
pub fn parse_date(raw: &str) -> BookingResult<Date> {
    if raw.is_empty() {
        return Err(BookingError::Validation("date is required".into()));
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|e| BookingError::Validation(format!("invalid date '{raw}': {e}")))
}

/// Parse an `HH:MM` time.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] if the value is empty or malformed.
pub fn parse_time(raw: &str) -> BookingResult<Time> {
    if raw.is_empty() {
        return Err(BookingError::Validation("time is required".into()));
    }
    Time::parse(raw, format_description!("[hour]:[minute]"))
        .map_err(|e| BookingError::Validation(format!("invalid time '{raw}': {e}")))
}

/// Generation token attached to an availability request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(pub u64);

impl fmt::Display for QueryTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues query tickets and decides which response is current.
#[derive(Debug, Clone, Default)]
pub struct QuerySequencer {
    latest: QueryTicket,
}

impl QuerySequencer {
    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&mut self) -> QueryTicket {
        self.latest = QueryTicket(self.latest.0 + 1);
        self.latest
    }

    /// Supersede every outstanding ticket without starting a new query.
    pub fn invalidate(&mut self) {
        self.issue();
    }

    #[must_use]
    pub fn current(&self) -> QueryTicket {
        self.latest
    }

    #[must_use]
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        ticket == self.latest
    }

    /// Accept `ticket` or explain why its response must be dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::StaleResponse`] if a newer ticket was issued.
    pub fn check(&self, ticket: QueryTicket) -> BookingResult<()> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            Err(BookingError::StaleResponse { ticket, current: self.latest })
        }
    }
}
