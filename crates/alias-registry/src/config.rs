//! Location of the aliases file
//!
//! By default the file lives at
//! `<user config dir>/<client>/<client>_aliases.json`. Setting
//! `ALIAS_REGISTRY_FILE` overrides the location entirely.

use std::path::{Path, PathBuf};

use crate::error::{AliasError, AliasResult};

/// Environment variable overriding the aliases file location
pub const FILE_ENV_VAR: &str = "ALIAS_REGISTRY_FILE";

/// Where a client keeps its aliases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasConfig {
    pub client_name: String,
    pub file_path: PathBuf,
}

impl AliasConfig {
    /// Use an explicit file path
    pub fn with_path(client_name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        AliasConfig {
            client_name: client_name.into(),
            file_path: file_path.into(),
        }
    }

    /// Resolve the file path from the environment and the user config dir
    pub fn resolve(client_name: impl Into<String>) -> AliasResult<Self> {
        let env_override = std::env::var_os(FILE_ENV_VAR).map(PathBuf::from);
        Self::resolve_from(client_name, env_override, dirs::config_dir())
    }

    /// Resolve from explicit inputs
    ///
    /// An empty override is ignored.
    pub fn resolve_from(
        client_name: impl Into<String>,
        env_override: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> AliasResult<Self> {
        let client_name = client_name.into();
        if client_name.is_empty() {
            return Err(AliasError::path_resolution("client name cannot be empty"));
        }

        if let Some(path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::with_path(client_name, path));
        }

        let config_dir = config_dir
            .ok_or_else(|| AliasError::path_resolution("no user configuration directory"))?;
        let file_path = default_file_path(&config_dir, &client_name);

        Ok(Self::with_path(client_name, file_path))
    }
}

/// `<config_dir>/<client>/<client>_aliases.json`
pub fn default_file_path(config_dir: &Path, client_name: &str) -> PathBuf {
    config_dir
        .join(client_name)
        .join(format!("{}_aliases.json", client_name))
}
