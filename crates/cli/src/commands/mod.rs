//! CLI command implementations

mod admin;
mod discovery;
mod graph;
mod username;

pub use admin::{cmd_config_init, cmd_config_show, cmd_departments};
pub use discovery::{cmd_network, cmd_search, cmd_suggest};
pub use graph::{GraphAction, cmd_graph, cmd_status};
pub use username::{UsernameAction, cmd_username};

use anyhow::{Result, bail};
use branchit::service::util::ServiceError;

/// Turn a service failure into a CLI error carrying its stable code.
pub(crate) fn service_failure<T>(result: Result<T, ServiceError>) -> Result<T> {
  match result {
    Ok(value) => Ok(value),
    Err(e) => bail!("[{}] {}", e.code(), e),
  }
}
