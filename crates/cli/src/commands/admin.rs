//! Configuration and catalogue commands

use anyhow::{Result, bail};
use branchit::{config::Config, service::profile};

use crate::store::Workspace;

/// Show the effective configuration for the current directory
pub async fn cmd_config_show() -> Result<()> {
  let cwd = std::env::current_dir()?;
  let config = Config::load_for_project(&cwd);

  let project_config = Config::project_config_path(&cwd);
  let user_config = Config::user_config_path();

  println!("Effective configuration for: {:?}", cwd);
  println!();

  if project_config.exists() {
    println!("Using project config: {:?}", project_config);
  } else if let Some(ref user_path) = user_config
    && user_path.exists()
  {
    println!("Using user config: {:?}", user_path);
  } else {
    println!("Using default configuration (no config file found)");
  }
  println!();

  println!("{}", toml::to_string_pretty(&config)?);
  Ok(())
}

/// Write a commented default config to `.branchit/config.toml`
pub async fn cmd_config_init() -> Result<()> {
  let cwd = std::env::current_dir()?;
  let config_path = Config::project_config_path(&cwd);

  if config_path.exists() {
    bail!("Config file already exists: {:?}. Delete it first to regenerate", config_path);
  }
  if let Some(parent) = config_path.parent() {
    std::fs::create_dir_all(parent)?;
  }

  std::fs::write(&config_path, Config::generate_template())?;
  println!("Created project config: {:?}", config_path);
  Ok(())
}

/// List valid departments
pub async fn cmd_departments(workspace: &Workspace, json_output: bool) -> Result<()> {
  let departments = profile::departments(&workspace.client.context()).await;
  if json_output {
    println!("{}", serde_json::to_string_pretty(&departments)?);
  } else {
    for department in departments {
      println!("{department}");
    }
  }
  Ok(())
}
