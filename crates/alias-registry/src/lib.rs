//! Persistent command aliases grouped by context
//!
//! This crate provides the alias store used by the command-line client:
//! - Alias definitions mapping a short name to a command on an instance
//! - Named contexts with one active context at a time
//! - JSON file format with migration of pre-context files
//! - Atomic saves through a same-directory staging file, keeping one `.bak`
//! - A session object that saves pending changes when dropped

pub mod codec;
pub mod config;
pub mod context;
pub mod dict;
pub mod error;
pub mod models;
pub mod persistence;
pub mod registry;
pub mod staging;

// Re-export public types
pub use codec::AliasDocument;
pub use config::AliasConfig;
pub use context::AliasContext;
pub use dict::AliasDict;
pub use error::{AliasError, AliasResult, IoOperation};
pub use models::{AliasDefinition, WorkingDirectory};
pub use persistence::AliasStore;
pub use registry::{AliasRegistry, DEFAULT_CONTEXT};
pub use staging::StagingFile;
