//! Relationship commands

use anyhow::Result;
use branchit::{domain::actor::ActorId, service::graph};

use super::service_failure;
use crate::{format::print_status, store::Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphAction {
  Follow,
  Unfollow,
  Request,
  Accept,
  Reject,
  Cancel,
  Disconnect,
}

impl GraphAction {
  fn past_tense(self) -> &'static str {
    match self {
      GraphAction::Follow => "Followed",
      GraphAction::Unfollow => "Unfollowed",
      GraphAction::Request => "Sent connection request to",
      GraphAction::Accept => "Accepted connection request from",
      GraphAction::Reject => "Rejected connection request from",
      GraphAction::Cancel => "Cancelled connection request to",
      GraphAction::Disconnect => "Removed connection with",
    }
  }
}

/// Apply one edge mutation as the signed-in actor
pub async fn cmd_graph(workspace: &Workspace, action: GraphAction, target: &str) -> Result<()> {
  let ctx = workspace.client.context();
  let target = ActorId::from(target);

  let result = match action {
    GraphAction::Follow => graph::follow(&ctx, &target).await,
    GraphAction::Unfollow => graph::unfollow(&ctx, &target).await,
    GraphAction::Request => graph::send_connection_request(&ctx, &target).await,
    GraphAction::Accept => graph::accept_connection_request(&ctx, &target).await,
    GraphAction::Reject => graph::reject_connection_request(&ctx, &target).await,
    GraphAction::Cancel => graph::cancel_connection_request(&ctx, &target).await,
    GraphAction::Disconnect => graph::remove_connection(&ctx, &target).await,
  };
  service_failure(result)?;

  println!("{} {}", action.past_tense(), target);
  Ok(())
}

/// Show how the actor relates to `target`
pub async fn cmd_status(workspace: &Workspace, target: &str, json_output: bool) -> Result<()> {
  let ctx = workspace.client.context();
  let status = service_failure(graph::relationship_status(&ctx, &ActorId::from(target)).await)?;

  if json_output {
    println!("{}", serde_json::to_string_pretty(&status)?);
  } else {
    print_status(&status);
  }
  Ok(())
}
