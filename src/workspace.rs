//! Private scratch directory for a single build.
//!
//! The directory is removed by `Workspace::release`, which reports removal
//! failures to the caller. A workspace that is dropped without being released
//! (for example while unwinding) is still removed, but any failure can only be
//! logged.

use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PREFIX: &str = "novel-book";

pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Workspace {
    /// Create a fresh directory under the system temporary directory.
    pub fn acquire() -> io::Result<Workspace> {
        Workspace::acquire_in(std::env::temp_dir())
    }

    /// Create a fresh directory under `root`, which must already exist.
    pub fn acquire_in<P: AsRef<Path>>(root: P) -> io::Result<Workspace> {
        let dir = tempfile::Builder::new().prefix(PREFIX).tempdir_in(root)?;
        let path = dir.path().to_path_buf();
        debug!("acquired workspace {}", path.display());
        Ok(Workspace {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory and everything in it.
    pub fn release(mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => {
                debug!("releasing workspace {}", self.path.display());
                dir.close()
            }
            None => Ok(()),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                warn!(
                    "failed to remove temporary workspace {}: {e}",
                    self.path.display()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_removes_directory_and_contents() {
        let workspace = Workspace::acquire().expect("can acquire workspace");
        let path = workspace.path().to_path_buf();
        std::fs::write(path.join("page_styles.css"), "p {}").expect("can write file");
        assert!(path.is_dir());

        workspace.release().expect("can release workspace");
        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_directory() {
        let workspace = Workspace::acquire().expect("can acquire workspace");
        let path = workspace.path().to_path_buf();
        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn workspaces_are_distinct() {
        let a = Workspace::acquire().expect("can acquire workspace");
        let b = Workspace::acquire().expect("can acquire workspace");
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn can_acquire_under_given_root() {
        let root = tempfile::tempdir().expect("can create temp dir");
        let workspace = Workspace::acquire_in(root.path()).expect("can acquire workspace");
        assert_eq!(workspace.path().parent(), Some(root.path()));
        workspace.release().expect("can release workspace");
    }

    #[test]
    fn acquire_fails_under_missing_root() {
        let root = tempfile::tempdir().expect("can create temp dir");
        assert!(Workspace::acquire_in(root.path().join("missing")).is_err());
    }

    #[test]
    fn release_reports_removal_failure() {
        let workspace = Workspace::acquire().expect("can acquire workspace");
        let path = workspace.path().to_path_buf();
        std::fs::remove_dir(&path).expect("can remove directory early");
        assert!(workspace.release().is_err());
    }
}
