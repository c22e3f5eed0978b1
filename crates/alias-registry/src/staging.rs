//! Same-directory staging file for atomic replacement
//!
//! A [`StagingFile`] ends in exactly one of two ways: [`StagingFile::commit`]
//! renames it over the target, or it is discarded. Discarding happens
//! explicitly through [`StagingFile::discard`] or implicitly when the value
//! is dropped, so early returns never leave it behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{AliasError, AliasResult, IoOperation};

/// A temporary file waiting to replace a target path
#[derive(Debug)]
pub struct StagingFile {
    file: NamedTempFile,
}

impl StagingFile {
    /// Create a hidden temp file in `dir`, named after `target_name`
    ///
    /// `dir` must be on the same filesystem as the final target for the
    /// commit rename to be atomic.
    pub fn create(dir: &Path, target_name: &str) -> AliasResult<Self> {
        let file = tempfile::Builder::new()
            .prefix(&format!(".{}.", target_name))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| AliasError::io(dir, IoOperation::Write, e))?;

        Ok(StagingFile { file })
    }

    /// Path of the staging file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Write the full contents and flush them to disk
    pub fn write_all(&mut self, contents: &[u8]) -> AliasResult<()> {
        let path = self.file.path().to_path_buf();
        self.file
            .write_all(contents)
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.as_file().sync_all())
            .map_err(|e| AliasError::io(path, IoOperation::Write, e))
    }

    /// Rename the staging file onto `target`
    ///
    /// On failure the staging file is removed.
    pub fn commit(self, target: &Path) -> AliasResult<PathBuf> {
        self.file
            .persist(target)
            .map_err(|e| AliasError::io(target, IoOperation::Move, e.error))?;
        Ok(target.to_path_buf())
    }

    /// Remove the staging file without touching the target
    pub fn discard(self) -> AliasResult<()> {
        let path = self.file.path().to_path_buf();
        self.file
            .close()
            .map_err(|e| AliasError::io(path, IoOperation::Delete, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_commit_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("aliases.json");
        fs::write(&target, "old").unwrap();

        let mut staging = StagingFile::create(dir.path(), "aliases.json").unwrap();
        let staged_path = staging.path().to_path_buf();
        assert_eq!(staged_path.parent(), Some(dir.path()));
        staging.write_all(b"new").unwrap();
        staging.commit(&target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(!staged_path.exists());
    }

    #[test]
    fn test_discard_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut staging = StagingFile::create(dir.path(), "aliases.json").unwrap();
        staging.write_all(b"data").unwrap();
        let staged_path = staging.path().to_path_buf();
        assert!(staged_path.exists());

        staging.discard().unwrap();
        assert!(!staged_path.exists());
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged_path = {
            let staging = StagingFile::create(dir.path(), "aliases.json").unwrap();
            staging.path().to_path_buf()
        };
        assert!(!staged_path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staging_name_is_hidden_temp() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingFile::create(dir.path(), "aliases.json").unwrap();
        let name = staging.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".aliases.json."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = StagingFile::create(&missing, "aliases.json").unwrap_err();
        assert_eq!(err.io_operation(), Some(IoOperation::Write));
    }
}
