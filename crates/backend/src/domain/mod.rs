//! Domain types - core business entities
//!
//! Profiles, reservations and derived relationship state, independent of the
//! document store that persists them.

pub mod actor;
pub mod config;
pub mod profile;
pub mod relationship;
pub mod username;
