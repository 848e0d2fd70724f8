// src/infra/paths.rs — Config path resolution
//
// WXDRAFT_HOME overrides everything; otherwise config lives in ~/.wxdraft/.

use std::path::PathBuf;

/// Returns the WXDRAFT_HOME override, if set.
fn wxdraft_home() -> Option<PathBuf> {
    std::env::var_os("WXDRAFT_HOME").map(PathBuf::from)
}

/// Configuration directory: $WXDRAFT_HOME/ or ~/.wxdraft/
pub fn config_dir() -> PathBuf {
    if let Some(home) = wxdraft_home() {
        return home;
    }
    dirs_home().join(".wxdraft")
}

/// Home directory, or the working directory when none can be determined.
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
