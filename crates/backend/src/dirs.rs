use std::path::PathBuf;

/// Directory holding the local store snapshot.
///
/// Respects the following environment variables (in order of precedence):
/// 1. BRANCHIT_DATA_DIR - explicit data directory override
/// 2. XDG_DATA_HOME - standard XDG data home directory
/// 3. dirs::data_local_dir() - platform default
pub fn default_data_dir() -> Option<PathBuf> {
  if let Ok(dir) = std::env::var("BRANCHIT_DATA_DIR") {
    return Some(PathBuf::from(dir));
  }

  if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
    return Some(PathBuf::from(xdg_data).join("branchit"));
  }

  dirs::data_local_dir().map(|dir| dir.join("branchit"))
}

/// Snapshot file used when no explicit store file is given.
pub fn default_store_path() -> Option<PathBuf> {
  default_data_dir().map(|dir| dir.join("store.json"))
}

/// Directory holding the user-level config.
///
/// BRANCHIT_CONFIG_DIR wins over XDG_CONFIG_HOME, which wins over the
/// platform default.
pub fn default_config_dir() -> Option<PathBuf> {
  if let Ok(dir) = std::env::var("BRANCHIT_CONFIG_DIR") {
    return Some(PathBuf::from(dir));
  }

  if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
    return Some(PathBuf::from(xdg_config).join("branchit"));
  }

  dirs::config_dir().map(|dir| dir.join("branchit"))
}
