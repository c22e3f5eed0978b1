//! Alias dictionary bound to a file for one client session
//!
//! # Usage
//!
//! ```no_run
//! use alias_registry::{AliasDefinition, AliasDict, WorkingDirectory};
//!
//! let mut aliases = AliasDict::open("/home/user/.config/client/client_aliases.json")?;
//! aliases.set_active_context("work");
//! aliases.add_alias("ll", AliasDefinition::new("vm1", "ls -la", WorkingDirectory::Map));
//! // Saved when `aliases` goes out of scope, or explicitly:
//! aliases.save()?;
//! # Ok::<(), alias_registry::AliasError>(())
//! ```

use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use tracing::error;

use crate::config::AliasConfig;
use crate::error::AliasResult;
use crate::persistence::AliasStore;
use crate::registry::AliasRegistry;

/// An [`AliasRegistry`] loaded from and saved back to its file
///
/// Pending changes are saved on drop. A failed save at that point is
/// reported to the diagnostic sink and the log; it never panics.
pub struct AliasDict {
    registry: AliasRegistry,
    store: AliasStore,
    diagnostics: Box<dyn Write + Send>,
}

impl AliasDict {
    /// Load the aliases file at `path`
    pub fn open(path: impl Into<PathBuf>) -> AliasResult<Self> {
        let store = AliasStore::new(path);
        let mut registry = AliasRegistry::new();
        store.load(&mut registry)?;

        Ok(AliasDict {
            registry,
            store,
            diagnostics: Box::new(std::io::stderr()),
        })
    }

    /// Load the aliases file described by `config`
    pub fn open_with_config(config: &AliasConfig) -> AliasResult<Self> {
        Self::open(config.file_path.clone())
    }

    /// Replace where teardown failures are reported
    pub fn with_diagnostics(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// The backing store
    pub fn store(&self) -> &AliasStore {
        &self.store
    }

    /// Reload from disk, discarding unsaved changes
    ///
    /// On error the registry is left empty and clean.
    pub fn reload(&mut self) -> AliasResult<()> {
        self.store.load(&mut self.registry)
    }

    /// Save unconditionally
    pub fn save(&mut self) -> AliasResult<()> {
        self.store.save(&mut self.registry)
    }

    /// Save only if something changed
    pub fn flush(&mut self) -> AliasResult<bool> {
        if !self.registry.is_dirty() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

impl Deref for AliasDict {
    type Target = AliasRegistry;

    fn deref(&self) -> &AliasRegistry {
        &self.registry
    }
}

impl DerefMut for AliasDict {
    fn deref_mut(&mut self) -> &mut AliasRegistry {
        &mut self.registry
    }
}

impl std::fmt::Debug for AliasDict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasDict")
            .field("registry", &self.registry)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Drop for AliasDict {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            error!("Error saving aliases dictionary: {}", e);
            let _ = writeln!(self.diagnostics, "Error saving aliases dictionary: {}", e);
        }
    }
}
