//! BranchIt CLI - social graph and username registry over a JSON document store

use std::path::PathBuf;

use anyhow::{Context, Result};
use branchit::{config::Config, domain::relationship::SearchFilter};
use clap::{Parser, Subcommand};

mod commands;
mod format;
mod logging;
mod store;

use commands::{
  GraphAction, UsernameAction, cmd_config_init, cmd_config_show, cmd_departments, cmd_graph, cmd_network, cmd_search,
  cmd_status, cmd_suggest, cmd_username,
};
use logging::init_cli_logging;
use store::Workspace;

#[derive(Parser)]
#[command(name = "branchit")]
#[command(about = "Social graph and username registry over a document store")]
#[command(after_help = "\
QUICK START:
  branchit config init                              # Write .branchit/config.toml
  branchit --data store.json --as u1 search ann     # Search as actor u1
  branchit --data store.json --as u1 follow u2      # Mutations are saved back to store.json

The store file maps collection -> document id -> document, e.g.
  {\"users\": {\"u1\": {\"displayName\": \"Ann\"}}}")]
struct Cli {
  /// JSON store snapshot to load and save after mutations (default: data dir store.json)
  #[arg(long, global = true, value_name = "FILE")]
  data: Option<PathBuf>,
  /// Act as this actor id
  #[arg(long = "as", global = true, value_name = "ACTOR")]
  actor: Option<String>,
  /// Email of the acting actor
  #[arg(long, global = true)]
  email: Option<String>,
  /// Config file (default: project, then user config)
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

/// Subcommands for `branchit username`
#[derive(Subcommand)]
pub enum UsernameCommand {
  /// Check whether a handle is valid and free
  Check { handle: String },
  /// Claim a handle
  Reserve { handle: String },
  /// Change to a new handle
  Change { handle: String },
  /// Release a handle you own
  Release { handle: String },
  /// Assign a generated handle if you have none
  Ensure {
    /// Email whose local part seeds the handle
    #[arg(long)]
    hint: Option<String>,
  },
}

/// Subcommands for `branchit config`
#[derive(Subcommand)]
pub enum ConfigCommand {
  /// Show effective configuration
  Show,
  /// Create a project config file
  Init,
}

#[derive(Subcommand)]
enum Commands {
  /// Search profiles by handle prefix or display name
  Search {
    query: String,
    #[arg(short, long)]
    limit: Option<usize>,
    /// all, connections, department, batch, mutual_connections, skills
    #[arg(short, long, default_value = "all")]
    filter: SearchFilter,
    #[arg(long)]
    json: bool,
  },
  /// Suggest people to connect with
  Suggest {
    #[arg(short, long)]
    limit: Option<usize>,
    /// Also draw a few random profiles from other departments or batches
    #[arg(long)]
    random: bool,
    #[arg(long)]
    json: bool,
  },
  /// Show how you relate to another actor
  Status {
    target: String,
    #[arg(long)]
    json: bool,
  },
  /// List followers, following, connections or pending requests
  Network {
    kind: String,
    /// Whose network (default: you)
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    json: bool,
  },
  /// Follow an actor
  Follow { target: String },
  /// Unfollow an actor
  Unfollow { target: String },
  /// Send a connection request
  Request { target: String },
  /// Accept a connection request
  Accept { requester: String },
  /// Reject a connection request
  Reject { requester: String },
  /// Cancel a connection request you sent
  Cancel { target: String },
  /// Remove a connection
  Disconnect { peer: String },
  /// Username registry
  Username {
    #[command(subcommand)]
    command: UsernameCommand,
  },
  /// List valid departments
  Departments {
    #[arg(long)]
    json: bool,
  },
  /// Configuration management
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
  match explicit {
    Some(path) => Config::load_from_file(path).with_context(|| format!("Failed to load config {}", path.display())),
    None => {
      let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
      Ok(Config::load_for_project(&cwd))
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let config = load_config(cli.config.as_ref())?;
  init_cli_logging(&config.log.level);

  let data = cli.data.clone().or_else(branchit::dirs::default_store_path);
  let data = data.as_deref();
  let workspace = Workspace::open(data, cli.actor.as_deref(), cli.email.as_deref(), config)?;

  let mutation = match cli.command {
    Commands::Search {
      query,
      limit,
      filter,
      json,
    } => return cmd_search(&workspace, &query, filter, limit, json).await,
    Commands::Suggest { limit, random, json } => return cmd_suggest(&workspace, limit, random, json).await,
    Commands::Status { target, json } => return cmd_status(&workspace, &target, json).await,
    Commands::Network { kind, user, json } => return cmd_network(&workspace, &kind, user.as_deref(), json).await,
    Commands::Departments { json } => return cmd_departments(&workspace, json).await,
    Commands::Config { command } => {
      return match command {
        ConfigCommand::Show => cmd_config_show().await,
        ConfigCommand::Init => cmd_config_init().await,
      };
    }

    Commands::Follow { target } => Some((GraphAction::Follow, target)),
    Commands::Unfollow { target } => Some((GraphAction::Unfollow, target)),
    Commands::Request { target } => Some((GraphAction::Request, target)),
    Commands::Accept { requester } => Some((GraphAction::Accept, requester)),
    Commands::Reject { requester } => Some((GraphAction::Reject, requester)),
    Commands::Cancel { target } => Some((GraphAction::Cancel, target)),
    Commands::Disconnect { peer } => Some((GraphAction::Disconnect, peer)),

    Commands::Username { command } => {
      let action = match command {
        UsernameCommand::Check { handle } => UsernameAction::Check(handle),
        UsernameCommand::Reserve { handle } => UsernameAction::Reserve(handle),
        UsernameCommand::Change { handle } => UsernameAction::Change(handle),
        UsernameCommand::Release { handle } => UsernameAction::Release(handle),
        UsernameCommand::Ensure { hint } => UsernameAction::Ensure(hint),
      };
      cmd_username(&workspace, action).await?;
      None
    }
  };

  if let Some((action, target)) = mutation {
    cmd_graph(&workspace, action, &target).await?;
  }
  workspace.save(data).await
}
