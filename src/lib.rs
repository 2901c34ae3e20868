//! Client core for reserving restaurant tables.
//!
//! SYSTEM CONTEXT
//! ==============
//! A diner picks a restaurant, a date, a time and a party size; the backend
//! answers with the tables free for that slot. Picking a table places a
//! ten-minute client-side hold, and submitting the contact form turns the
//! hold into a reservation.
//!
//! - `net` talks to the REST backend.
//! - `state` holds the pure booking state: query sequencing, the table
//!   grid, the hold timer and the submitter.
//! - `flow` drives one booking session on tokio.
//! - `catalog` filters restaurant lists and runs the express search.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod net;
pub mod state;

#[cfg(test)]
mod test_helpers;
