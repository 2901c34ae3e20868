//! Async driver for one booking session.
//!
//! DESIGN
//! ======
//! `BookingFlow` is the single logical actor: every state change happens on
//! `&mut self`, so no locking is involved. Availability fetches run as
//! detached tasks tagged with their query ticket and report back through an
//! unbounded channel; responses may arrive in any order and the session's
//! ticket check drops the stale ones. Cancellation of a superseded fetch is
//! advisory: its response is ignored, the request itself is not aborted.
//!
//! The countdown is a `CountdownGuard` owned here. `sync_countdown` runs
//! after every mutation and keeps exactly one guard alive while the session
//! is `Holding` (matching its hold generation) and none otherwise. Dropping
//! the flow drops the guard.
//!
//! Every user action first applies whatever is already queued on the
//! channel, so a hold whose ticks ran out while nobody was pumping
//! `next_event` is expired before `submit`, `select_table`, `deselect` or
//! `search` act on it.

#[cfg(test)]
#[path = "flow_test.rs"]
mod flow_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::auth::TokenProvider;
use crate::error::{BookingError, BookingResult};
use crate::net::api::ReservationApi;
use crate::net::types::{Id, Table};
use crate::state::hold::{CountdownGuard, HoldEvent, HoldGeneration};
use crate::state::notice::Notice;
use crate::state::query::QueryTicket;
use crate::state::session::{BookingSession, ContactForm};
use crate::state::submit::{ReservationConfirmation, ReservationSubmitter};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Messages delivered to the flow from background tasks.
#[derive(Debug)]
enum FlowEvent {
    Availability { ticket: QueryTicket, result: BookingResult<Vec<Table>> },
    Tick(HoldGeneration),
}

/// What `next_event` did with the event it consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowUpdate {
    AvailabilityApplied { ticket: QueryTicket, available: usize },
    AvailabilityFailed { ticket: QueryTicket, error: BookingError },
    StaleDropped { ticket: QueryTicket },
    Countdown { remaining_secs: u32 },
    HoldExpired { table_id: Id },
    /// A tick for a hold that no longer exists.
    Ignored,
}

pub struct BookingFlow {
    session: BookingSession,
    api: Arc<dyn ReservationApi>,
    submitter: ReservationSubmitter,
    tx: mpsc::UnboundedSender<FlowEvent>,
    rx: mpsc::UnboundedReceiver<FlowEvent>,
    countdown: Option<CountdownGuard>,
}

impl BookingFlow {
    #[must_use]
    pub fn new(api: Arc<dyn ReservationApi>, tokens: Arc<dyn TokenProvider>, hold_secs: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let submitter = ReservationSubmitter::new(api.clone(), tokens);
        Self { session: BookingSession::new(hold_secs), api, submitter, tx, rx, countdown: None }
    }

    #[must_use]
    pub fn session(&self) -> &BookingSession {
        &self.session
    }

    /// Whether a countdown task is currently running.
    #[must_use]
    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    /// Fetch a restaurant and install its table layout.
    ///
    /// # Errors
    ///
    /// Propagates the backend error; the session is left unchanged.
    pub async fn load_restaurant(&mut self, restaurant_id: Id) -> BookingResult<()> {
        let restaurant = self.api.fetch_restaurant(restaurant_id).await?;
        self.session.load_restaurant(restaurant);
        self.sync_countdown();
        Ok(())
    }

    /// Change the search and start fetching availability for it.
    ///
    /// The hold and selection are cleared before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] without touching the network when
    /// the parameters are invalid.
    pub fn search(&mut self, date: &str, time: &str, guests: u32) -> BookingResult<QueryTicket> {
        self.drain_pending();
        let (ticket, query) = self.session.set_params(date, time, guests)?;
        self.sync_countdown();

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.check_availability(&query).await;
            let _ = tx.send(FlowEvent::Availability { ticket, result });
        });
        Ok(ticket)
    }

    pub fn select_table(&mut self, table_id: Id) -> bool {
        self.drain_pending();
        let selected = self.session.select_table(table_id);
        self.sync_countdown();
        selected
    }

    pub fn deselect(&mut self) {
        self.drain_pending();
        self.session.deselect();
        self.sync_countdown();
    }

    pub fn set_contact(&mut self, contact: ContactForm) {
        self.session.set_contact(contact);
    }

    /// Wait for the next background event and apply it.
    ///
    /// Returns `None` only if the event channel is closed, which cannot
    /// happen while the flow is alive. Callers should only await this while
    /// a fetch or countdown is outstanding.
    pub async fn next_event(&mut self) -> Option<FlowUpdate> {
        let event = self.rx.recv().await?;
        let update = self.apply(event);
        self.sync_countdown();
        Some(update)
    }

    /// Apply events that are already queued without waiting for more.
    fn drain_pending(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            let update = self.apply(event);
            debug!(?update, "applied queued event");
        }
        self.sync_countdown();
    }

    fn apply(&mut self, event: FlowEvent) -> FlowUpdate {
        match event {
            FlowEvent::Availability { ticket, result: Ok(tables) } => {
                match self.session.apply_availability(ticket, &tables) {
                    Ok(available) => FlowUpdate::AvailabilityApplied { ticket, available },
                    Err(_) => FlowUpdate::StaleDropped { ticket },
                }
            }
            FlowEvent::Availability { ticket, result: Err(error) } => {
                if self.session.fail_availability(ticket, &error) {
                    warn!(%ticket, error = %error, "availability request failed");
                    FlowUpdate::AvailabilityFailed { ticket, error }
                } else {
                    FlowUpdate::StaleDropped { ticket }
                }
            }
            FlowEvent::Tick(generation) => match self.session.tick(generation) {
                Some(HoldEvent::Expired { table_id }) => FlowUpdate::HoldExpired { table_id },
                None => {
                    let current = self.session.hold().generation() == generation;
                    match self.session.hold().remaining_secs() {
                        Some(remaining_secs) if current => FlowUpdate::Countdown { remaining_secs },
                        _ => {
                            debug!(generation, "ignoring tick for finished hold");
                            FlowUpdate::Ignored
                        }
                    }
                }
            },
        }
    }

    /// Submit the reservation for the held table.
    ///
    /// # Errors
    ///
    /// See [`ReservationSubmitter::submit`].
    pub async fn submit(&mut self) -> BookingResult<ReservationConfirmation> {
        self.drain_pending();
        let result = self.submitter.submit(&mut self.session).await;
        self.sync_countdown();
        result
    }

    /// Drain pending user-facing notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.session.notices_mut().drain()
    }

    /// Release everything the session holds and stop the countdown.
    pub fn teardown(&mut self) {
        self.session.reset();
        self.sync_countdown();
    }

    /// Keep the countdown task in step with the hold.
    fn sync_countdown(&mut self) {
        let hold = self.session.hold();
        if !hold.is_holding() {
            self.countdown = None;
            return;
        }
        let generation = hold.generation();
        if self.countdown.as_ref().map(CountdownGuard::generation) == Some(generation) {
            return;
        }
        self.countdown = None;
        self.countdown = Some(CountdownGuard::spawn(generation, TICK_PERIOD, self.tx.clone(), FlowEvent::Tick));
    }
}
