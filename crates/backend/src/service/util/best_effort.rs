use std::future::Future;

use tracing::warn;

use super::ServiceError;

/// Await `fut`, turning any failure into `T::default()`.
///
/// Discovery reads are advisory: a store outage yields an empty result rather
/// than an error. The failure is still logged.
pub async fn best_effort<T, E, F>(operation: &'static str, fut: F) -> T
where
  T: Default,
  E: Into<ServiceError>,
  F: Future<Output = Result<T, E>>,
{
  match fut.await {
    Ok(value) => value,
    Err(e) => {
      let err: ServiceError = e.into();
      warn!(operation, code = err.code(), err = %err, "Discovery read failed, degrading to empty result");
      T::default()
    }
  }
}
