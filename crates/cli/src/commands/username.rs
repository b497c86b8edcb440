//! Username registry commands

use anyhow::Result;
use branchit::service::username;

use super::service_failure;
use crate::store::Workspace;

#[derive(Debug, Clone)]
pub enum UsernameAction {
  Check(String),
  Reserve(String),
  Change(String),
  Release(String),
  Ensure(Option<String>),
}

pub async fn cmd_username(workspace: &Workspace, action: UsernameAction) -> Result<()> {
  let ctx = workspace.client.context();

  match action {
    UsernameAction::Check(handle) => {
      let available = service_failure(username::is_available(&ctx, &handle).await)?;
      let handle = username::normalize(&handle);
      if available {
        println!("@{handle} is available");
      } else {
        println!("@{handle} is taken");
      }
    }
    UsernameAction::Reserve(handle) => {
      let handle = service_failure(username::reserve(&ctx, &handle).await)?;
      println!("Reserved @{handle}");
    }
    UsernameAction::Change(handle) => {
      let handle = service_failure(username::change_username(&ctx, &handle).await)?;
      println!("Username is now @{handle}");
    }
    UsernameAction::Release(handle) => {
      service_failure(username::release(&ctx, &handle).await)?;
      println!("Released @{}", username::normalize(&handle));
    }
    UsernameAction::Ensure(email) => {
      let handle = service_failure(username::ensure_assigned(&ctx, email.as_deref()).await)?;
      println!("Username: @{handle}");
    }
  }
  Ok(())
}
