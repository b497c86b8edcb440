//! Shared utilities for service operations.

mod best_effort;
mod error;

pub use best_effort::best_effort;
pub use error::ServiceError;
