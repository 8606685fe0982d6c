//! Booking management for a boat tour operator
//!
//! Boats, captains and bookings live in an in-memory [`store::Store`] for the
//! duration of a session. The [`availability`] module decides which boats and
//! captains can still be assigned to a requested booking window.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod models;
pub mod seed;
pub mod session;
pub mod store;
