use futures::future::BoxFuture;
use tracing::{debug, warn};

use super::store::{DbError, DocumentStore, Transaction};

/// Future returned by a transaction body, borrowing the transaction handle.
pub type TransactionBody<'t, T, E> = BoxFuture<'t, std::result::Result<T, E>>;

/// Run `body` inside an optimistic transaction, retrying on commit conflicts.
///
/// The body may run several times, so it must only capture owned data and
/// must not have side effects outside the transaction. An `Err` from the body
/// aborts without writing anything. After `attempts` conflicting commits the
/// conflict itself is returned.
pub async fn run_transaction<T, E, F>(store: &dyn DocumentStore, attempts: usize, body: F) -> std::result::Result<T, E>
where
  F: for<'t> Fn(&'t mut Box<dyn Transaction>) -> TransactionBody<'t, T, E>,
  E: From<DbError>,
{
  let attempts = attempts.max(1);
  let mut attempt = 0;

  loop {
    attempt += 1;
    let mut tx = store.begin().await?;
    let value = body(&mut tx).await?;

    match tx.commit().await {
      Ok(()) => {
        if attempt > 1 {
          debug!(attempt, "Transaction committed after retry");
        }
        return Ok(value);
      }
      Err(DbError::Conflict(target)) if attempt < attempts => {
        debug!(attempt, max_attempts = attempts, target = %target, "Transaction conflict, retrying");
      }
      Err(e) => {
        warn!(attempt, err = %e, "Transaction commit failed");
        return Err(e.into());
      }
    }
  }
}
