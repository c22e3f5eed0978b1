//! Loading and atomically saving the aliases file
//!
//! # Save protocol
//!
//! 1. Prune empty contexts other than the active one.
//! 2. Encode the registry (fails on invalid working directories).
//! 3. Stage the encoded document in a temp file next to the target.
//! 4. If the target exists, replace `<path>.bak` with it.
//! 5. Rename the staged file onto the target.
//!
//! Only steps 4 and 5 touch the live file, and the live file is always
//! renamed, never rewritten in place. A crash part way through may leave a
//! `.bak` without a primary file, but never a truncated primary file.
//!
//! Two processes saving at once race; the last rename wins.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec;
use crate::error::{AliasError, AliasResult, IoOperation};
use crate::registry::AliasRegistry;
use crate::staging::StagingFile;

const BACKUP_SUFFIX: &str = ".bak";

/// File backed store for an [`AliasRegistry`]
#[derive(Debug, Clone)]
pub struct AliasStore {
    path: PathBuf,
}

impl AliasStore {
    /// Create a store for the given aliases file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AliasStore { path: path.into() }
    }

    /// Path of the primary aliases file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the single backup generation, `<path>.bak`
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Load the file into `registry`, replacing its contents
    ///
    /// A missing file leaves the registry empty with its active context
    /// unchanged. Empty or unparsable files are treated the same way.
    ///
    /// An invalid working directory fails the load and leaves the registry
    /// empty and clean, so stale state is never saved back over the file.
    pub fn load(&self, registry: &mut AliasRegistry) -> AliasResult<()> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No aliases file at {}, starting empty", self.path.display());
                registry.replace_with(codec::AliasDocument::default());
                return Ok(());
            }
            Err(e) => return Err(AliasError::io(&self.path, IoOperation::Read, e)),
        };

        let document = match codec::decode_bytes(&content) {
            Ok(document) => document,
            Err(e) => {
                registry.replace_with(codec::AliasDocument::default());
                return Err(e);
            }
        };
        registry.replace_with(document);

        debug!(
            "Loaded {} alias context(s) from {}, active context '{}'",
            registry.len(),
            self.path.display(),
            registry.get_active_context()
        );
        Ok(())
    }

    /// Save `registry` atomically, rotating the previous file to `.bak`
    pub fn save(&self, registry: &mut AliasRegistry) -> AliasResult<()> {
        let pruned = registry.sanitize();
        if !pruned.is_empty() {
            debug!("Pruned empty alias contexts: {:?}", pruned);
        }

        let contents = codec::to_pretty_string(registry)?;

        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|e| AliasError::io(&dir, IoOperation::CreateDir, e))?;

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "aliases.json".to_string());

        let mut staging = StagingFile::create(&dir, &file_name)?;
        debug!("Staging aliases in {}", staging.path().display());
        staging.write_all(contents.as_bytes())?;

        if self.path.exists() {
            self.rotate_backup()?;
        }

        staging.commit(&self.path)?;
        registry.mark_clean();

        info!("Saved aliases to {}", self.path.display());
        Ok(())
    }

    fn rotate_backup(&self) -> AliasResult<()> {
        let backup = self.backup_path();

        if backup.exists() {
            fs::remove_file(&backup).map_err(|e| AliasError::io(&backup, IoOperation::Delete, e))?;
        }

        fs::rename(&self.path, &backup).map_err(|e| AliasError::io(&backup, IoOperation::Move, e))?;
        debug!("Rotated {} to {}", self.path.display(), backup.display());
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AliasDefinition, WorkingDirectory};

    fn def(instance: &str, command: &str) -> AliasDefinition {
        AliasDefinition::new(instance, command, WorkingDirectory::Default)
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        let store = AliasStore::new("/home/user/.config/client/client_aliases.json");
        assert_eq!(
            store.backup_path(),
            PathBuf::from("/home/user/.config/client/client_aliases.json.bak")
        );
    }

    #[test]
    fn test_load_missing_file_keeps_active_context() {
        let dir = tempfile::tempdir().unwrap();
        let store = AliasStore::new(dir.path().join("aliases.json"));

        let mut registry = AliasRegistry::new();
        registry.set_active_context("work");
        registry.add_alias("ll", def("vm1", "ls"));

        store.load(&mut registry).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.get_active_context(), "work");
        assert!(!registry.is_dirty());
    }

    #[test]
    fn test_load_unreadable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let store = AliasStore::new(dir.path());
        let err = store.load(&mut AliasRegistry::new()).unwrap_err();
        assert_eq!(err.io_operation(), Some(IoOperation::Read));
    }

    #[test]
    fn test_load_invalid_working_directory_clears_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = AliasStore::new(dir.path().join("aliases.json"));
        fs::write(
            store.path(),
            r#"{"ll":{"instance":"vm1","command":"ls","working-directory":"bogus"}}"#,
        )
        .unwrap();

        let mut registry = AliasRegistry::new();
        registry.add_alias("old", def("vm1", "ls"));

        assert!(store.load(&mut registry).is_err());
        assert!(registry.is_empty());
        assert!(!registry.exists_alias("old"));
        assert!(!registry.is_dirty());
    }

    #[test]
    fn test_save_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client").join("client_aliases.json");
        let store = AliasStore::new(&path);

        let mut registry = AliasRegistry::new();
        registry.add_alias("ll", def("vm1", "ls"));
        store.save(&mut registry).unwrap();

        assert!(path.exists());
        assert!(!store.backup_path().exists());
        assert!(!registry.is_dirty());
    }

    #[test]
    fn test_save_invalid_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AliasStore::new(dir.path().join("aliases.json"));

        let mut registry = AliasRegistry::new();
        registry.add_alias(
            "ll",
            AliasDefinition {
                instance: "vm1".to_string(),
                command: "ls".to_string(),
                working_directory: "bogus".to_string(),
            },
        );

        assert!(store.save(&mut registry).is_err());
        assert!(registry.is_dirty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_rotation_leaves_primary_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = AliasStore::new(dir.path().join("aliases.json"));
        fs::write(store.path(), "previous").unwrap();

        // A non-empty directory squatting on the backup path cannot be removed as a file.
        fs::create_dir(store.backup_path()).unwrap();
        fs::write(store.backup_path().join("keep"), "x").unwrap();

        let mut registry = AliasRegistry::new();
        registry.add_alias("ll", def("vm1", "ls"));

        let err = store.save(&mut registry).unwrap_err();
        assert_eq!(err.io_operation(), Some(IoOperation::Delete));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "previous");
        assert!(registry.is_dirty());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = AliasStore::new(dir.path().join("aliases.json"));

        let mut registry = AliasRegistry::new();
        registry.set_active_context("work");
        registry.add_alias("ll", AliasDefinition::new("vm1", "ls -la", WorkingDirectory::Map));
        store.save(&mut registry).unwrap();

        let mut loaded = AliasRegistry::new();
        store.load(&mut loaded).unwrap();
        assert_eq!(loaded.get_active_context(), "work");
        assert_eq!(
            loaded.get_alias("ll"),
            Some(&AliasDefinition::new("vm1", "ls -la", WorkingDirectory::Map))
        );
    }
}
