//! Discovery and search.
//!
//! Everything here is advisory. Store failures never reach the caller: they
//! are logged and the operation returns an empty (or, for suggestions,
//! partial) result. Reads go to the store directly; the profile cache is
//! never consulted.
//!
//! ## Available Operations
//!
//! - [`search`] - handle prefix and display-name search with filters and ranking
//! - [`suggestions`] - department, batch and random suggestions
//! - [`pending_requests`], [`connections`], [`followers`], [`following`] - network listings

mod network;
mod ranking;
mod search;
mod suggestions;

pub use self::{
  network::{connections, followers, following, pending_requests},
  ranking::{matches_filter, rank},
  search::search,
  suggestions::suggestions,
};
