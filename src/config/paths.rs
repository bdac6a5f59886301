//! Directory path resolution
//!
//! Resolves platform-appropriate locations for configuration and schema
//! manifests.
//! - Linux/macOS: XDG Base Directory specification (~/.config)
//! - Windows: Known Folder API (AppData\Roaming)

use std::path::PathBuf;

/// Get the configuration directory path
///
/// Checks the RESBRIDGE_CONFIG_DIR environment variable first, then
/// falls back to the platform config directory joined with "resbridge".
pub fn config_dir() -> PathBuf {
    std::env::var("RESBRIDGE_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", "resbridge")
                    .map(|dirs| dirs.config_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join("resbridge"))
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".config"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".config"))
                    })
                    .join("resbridge")
            }
        })
}

/// Path of the root configuration file
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Directory scanned for user schema manifests
pub fn user_schemas_dir() -> PathBuf {
    config_dir().join("schemas")
}
