//! Configuration for the BranchIt core with per-project overrides.
//!
//! Config priority: project-relative (.branchit/config.toml) > user (~/.config/branchit/config.toml) > defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Departments offered when the `config/departments` document is missing or unreadable.
pub const DEFAULT_DEPARTMENTS: &[&str] = &[
  "Computer Science & Engineering",
  "Information Technology",
  "Electronics & Communication Engineering",
  "Electrical Engineering",
  "Mechanical Engineering",
  "Civil Engineering",
  "Chemical Engineering",
  "Biotechnology",
  "Master of Computer Applications (MCA)",
  "Master of Business Administration (MBA)",
];

// ============================================================================
// Store Configuration
// ============================================================================

/// Document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// How many times a transaction body is run before a commit conflict is
  /// surfaced to the caller (default: 5)
  pub transaction_attempts: u32,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      transaction_attempts: 5,
    }
  }
}

// ============================================================================
// Username Registry Configuration
// ============================================================================

/// Username registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
  /// Days an actor must wait between handle changes (default: 0 = disabled)
  pub cooldown_days: u64,

  /// Numeric suffixes tried after the base candidate during auto-assignment (default: 20)
  pub max_suffix_tries: u32,

  /// Literal prefix for auto-assigned handles (default: "user_")
  pub default_prefix: String,
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      cooldown_days: 0,
      max_suffix_tries: 20,
      default_prefix: "user_".to_string(),
    }
  }
}

impl RegistryConfig {
  pub fn cooldown_millis(&self) -> i64 {
    (self.cooldown_days as i64).saturating_mul(24 * 60 * 60 * 1000)
  }
}

// ============================================================================
// Discovery Configuration
// ============================================================================

/// Search and suggestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
  /// Default result limit for search (default: 20)
  pub search_limit: usize,

  /// Profiles scanned for display-name matches per search (default: 100)
  pub display_name_scan_cap: usize,

  /// Default result limit for suggestions (default: 10)
  pub suggestion_limit: usize,

  /// Profiles scanned when drawing random suggestions (default: 50)
  pub random_pool_cap: usize,

  /// Random suggestions appended at most (default: 2)
  pub random_pick: usize,
}

impl Default for DiscoveryConfig {
  fn default() -> Self {
    Self {
      search_limit: 20,
      display_name_scan_cap: 100,
      suggestion_limit: 10,
      random_pool_cap: 50,
      random_pick: 2,
    }
  }
}

// ============================================================================
// Profile Configuration
// ============================================================================

/// Profile editing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
  /// Largest accepted resume upload in bytes (default: 1000000)
  pub resume_max_bytes: usize,

  /// Fallback department list (default: 10 built-in departments)
  pub default_departments: Vec<String>,
}

impl Default for ProfileConfig {
  fn default() -> Self {
    Self {
      resume_max_bytes: 1_000_000,
      default_departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
    }
  }
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// Log level: off, error, warn, info, debug, trace (default: info)
  pub level: String,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
  /// Document store settings
  #[serde(default)]
  pub store: StoreConfig,

  /// Username registry settings
  #[serde(default)]
  pub registry: RegistryConfig,

  /// Search and suggestion settings
  #[serde(default)]
  pub discovery: DiscoveryConfig,

  /// Profile editing settings
  #[serde(default)]
  pub profile: ProfileConfig,

  /// Logging settings
  #[serde(default)]
  pub log: LogConfig,
}

impl Config {
  /// Load config for a project, with fallback to user config
  pub fn load_for_project(project_path: &Path) -> Self {
    // Try project-relative first
    let project_config = Self::project_config_path(project_path);
    if project_config.exists()
      && let Ok(content) = std::fs::read_to_string(&project_config)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    // Fall back to user config
    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
      && let Ok(content) = std::fs::read_to_string(&user_config_path)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }

    Self::default()
  }

  /// Load config from an explicit file.
  pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    crate::dirs::default_config_dir().map(|dir| dir.join("config.toml"))
  }

  /// Get the project-relative config path
  pub fn project_config_path(project_path: &Path) -> PathBuf {
    project_path.join(".branchit").join("config.toml")
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Config::default();
    let departments = defaults
      .profile
      .default_departments
      .iter()
      .map(|d| format!("  \"{}\",", d))
      .collect::<Vec<_>>()
      .join("\n");

    format!(
      r#"# BranchIt Configuration
# Place in .branchit/config.toml (project) or ~/.config/branchit/config.toml (user)

# ============================================================================
# Document Store
# ============================================================================

[store]
# Attempts per transaction before a commit conflict is reported
transaction_attempts = {attempts}

# ============================================================================
# Username Registry
# ============================================================================

[registry]
# Days between handle changes (0 disables the cooldown)
cooldown_days = {cooldown}
# Numeric suffixes tried when auto-assigning a handle
max_suffix_tries = {suffixes}
# Prefix for auto-assigned handles
default_prefix = "{prefix}"

# ============================================================================
# Discovery
# ============================================================================

[discovery]
search_limit = {search_limit}
# Profiles scanned for display-name matches
display_name_scan_cap = {scan_cap}
suggestion_limit = {suggestion_limit}
# Profiles scanned for random suggestions
random_pool_cap = {pool_cap}
random_pick = {pick}

# ============================================================================
# Profile
# ============================================================================

[profile]
# Largest accepted resume upload in bytes
resume_max_bytes = {resume_max}
# Used when the config/departments document is unavailable
default_departments = [
{departments}
]

# ============================================================================
# Logging
# ============================================================================

[log]
# off, error, warn, info, debug, trace (RUST_LOG overrides)
level = "{level}"
"#,
      attempts = defaults.store.transaction_attempts,
      cooldown = defaults.registry.cooldown_days,
      suffixes = defaults.registry.max_suffix_tries,
      prefix = defaults.registry.default_prefix,
      search_limit = defaults.discovery.search_limit,
      scan_cap = defaults.discovery.display_name_scan_cap,
      suggestion_limit = defaults.discovery.suggestion_limit,
      pool_cap = defaults.discovery.random_pool_cap,
      pick = defaults.discovery.random_pick,
      resume_max = defaults.profile.resume_max_bytes,
      departments = departments,
      level = defaults.log.level,
    )
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Invalid config: {0}")]
  Parse(#[from] toml::de::Error),
}
