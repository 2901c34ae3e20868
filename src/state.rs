//! Booking state: one module per interaction concern.
//!
//! DESIGN
//! ======
//! `query`, `grid`, `hold` and `submit` are small focused models;
//! `session` composes them and enforces the rules that span them. Nothing
//! in here performs I/O except `submit`, which talks to the backend through
//! the injected `ReservationApi`.

pub mod grid;
pub mod hold;
pub mod notice;
pub mod query;
pub mod session;
pub mod submit;
