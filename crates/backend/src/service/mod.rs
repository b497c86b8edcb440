//! Business logic services.
//!
//! Services are stateless free functions over a borrowed [`ServiceContext`];
//! every dependency arrives through it.
//!
//! ## Available Services
//!
//! - [`graph`] - follow edges and the connection request lifecycle
//! - [`username`] - unique handle registry
//! - [`discovery`] - search, suggestions and network listings
//! - [`profile`] - profile reads, edits, media and the department catalogue

pub mod context;
pub mod discovery;
pub mod graph;
pub mod profile;
pub mod username;
pub mod util;

pub use context::ServiceContext;
