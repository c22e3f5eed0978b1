//! Core data models for aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AliasError, AliasResult};

/// How the working directory is chosen when an alias runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingDirectory {
    /// Run from the instance's default directory
    #[default]
    Default,
    /// Map the caller's directory to the matching path on the instance
    Map,
}

impl WorkingDirectory {
    /// The literal string stored on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkingDirectory::Default => "default",
            WorkingDirectory::Map => "map",
        }
    }
}

impl fmt::Display for WorkingDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkingDirectory {
    type Err = AliasError;

    // Exact match only: "Map" or " map" are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(WorkingDirectory::Default),
            "map" => Ok(WorkingDirectory::Map),
            _ => Err(AliasError::invalid_working_directory(s)),
        }
    }
}

/// A single aliased command
///
/// `working_directory` holds the raw persisted string; use
/// [`AliasDefinition::working_directory_mode`] to validate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AliasDefinition {
    pub instance: String,
    pub command: String,
    pub working_directory: String,
}

impl AliasDefinition {
    /// Create a new alias definition
    pub fn new(
        instance: impl Into<String>,
        command: impl Into<String>,
        working_directory: WorkingDirectory,
    ) -> Self {
        AliasDefinition {
            instance: instance.into(),
            command: command.into(),
            working_directory: working_directory.as_str().to_string(),
        }
    }

    /// Parse and validate the working directory mode
    pub fn working_directory_mode(&self) -> AliasResult<WorkingDirectory> {
        self.working_directory.parse()
    }
}
