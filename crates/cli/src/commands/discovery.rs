//! Search, suggestion and network listing commands

use anyhow::Result;
use branchit::{
  domain::{actor::ActorId, profile::UserProfile, relationship::SearchFilter},
  service::discovery,
};

use crate::{format::print_profiles, store::Workspace};

fn output(profiles: &[UserProfile], json_output: bool) -> Result<()> {
  if json_output {
    println!("{}", serde_json::to_string_pretty(profiles)?);
  } else {
    print_profiles(profiles);
  }
  Ok(())
}

/// Search profiles by handle prefix or display name
pub async fn cmd_search(
  workspace: &Workspace,
  query: &str,
  filter: SearchFilter,
  limit: Option<usize>,
  json_output: bool,
) -> Result<()> {
  let ctx = workspace.client.context();
  let limit = limit.unwrap_or(ctx.config.discovery.search_limit);
  let results = discovery::search(&ctx, query, filter, limit).await;
  output(&results, json_output)
}

/// Suggest people to connect with
pub async fn cmd_suggest(workspace: &Workspace, limit: Option<usize>, random: bool, json_output: bool) -> Result<()> {
  let ctx = workspace.client.context();
  let limit = limit.unwrap_or(ctx.config.discovery.suggestion_limit);
  let results = discovery::suggestions(&ctx, limit, random).await;
  output(&results, json_output)
}

/// List one edge set: followers, following, connections or pending
pub async fn cmd_network(workspace: &Workspace, kind: &str, user: Option<&str>, json_output: bool) -> Result<()> {
  let ctx = workspace.client.context();
  let user = user.map(ActorId::from);

  let results = match kind {
    "followers" => discovery::followers(&ctx, user.as_ref()).await,
    "following" => discovery::following(&ctx, user.as_ref()).await,
    "connections" => discovery::connections(&ctx, user.as_ref()).await,
    "pending" => discovery::pending_requests(&ctx).await,
    other => anyhow::bail!("Unknown listing '{other}'. Use followers, following, connections or pending"),
  };
  output(&results, json_output)
}
