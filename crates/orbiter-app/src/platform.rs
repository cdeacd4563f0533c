//! Platform directory resolution.
//!
//! Config files and logs live in the OS-conventional locations (XDG on
//! Linux, Known Folders on Windows, Library on macOS).

use std::path::{Path, PathBuf};
use std::{fmt, io};

/// Errors that can occur during platform operations.
#[derive(Debug)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    NoConfigDir,
    /// Directory creation failed.
    Io(io::Error),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "could not determine OS configuration directory"),
            Self::Io(e) => write!(f, "platform I/O error: {e}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::NoConfigDir => None,
        }
    }
}

impl From<io::Error> for PlatformError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

const APP_NAME: &str = "orbiter";

/// Name of the key-binding file kept next to `config.ron`.
pub const INPUT_FILE_NAME: &str = "input.ron";

/// Where the viewer keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// `config.ron` and `input.ron`.
    pub config_dir: PathBuf,
    /// Debug-build JSON log.
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve directories without creating them.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_dir = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        let log_dir = dirs::data_local_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| config_dir.clone())
            .join("logs");
        Ok(Self {
            config_dir,
            log_dir,
        })
    }

    /// Directories rooted under `root`, for tests.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.clone(),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Use `config_dir` in place of the resolved one, keeping the log dir.
    #[must_use]
    pub fn with_config_dir(mut self, config_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = config_dir {
            self.config_dir = dir;
        }
        self
    }

    /// Create every directory on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if a directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    /// Path of the key-binding file.
    pub fn input_bindings_path(&self) -> PathBuf {
        self.config_dir.join(INPUT_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root_layout() {
        let root = Path::new("/tmp/orbiter-test-root");
        let dirs = PlatformDirs::resolve_with_root(root);
        assert_eq!(dirs.config_dir, root.join("orbiter"));
        assert_eq!(dirs.log_dir, root.join("orbiter").join("logs"));
        assert_eq!(
            dirs.input_bindings_path(),
            root.join("orbiter").join("input.ron")
        );
    }

    #[test]
    fn test_config_dir_override() {
        let dirs = PlatformDirs::resolve_with_root(Path::new("/a"))
            .with_config_dir(Some(PathBuf::from("/b")));
        assert_eq!(dirs.config_dir, PathBuf::from("/b"));
        assert_eq!(dirs.log_dir, PathBuf::from("/a/orbiter/logs"));

        let unchanged = PlatformDirs::resolve_with_root(Path::new("/a")).with_config_dir(None);
        assert_eq!(unchanged.config_dir, PathBuf::from("/a/orbiter"));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
        // Creating again is fine.
        dirs.create_dirs().unwrap();
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PlatformError::NoConfigDir.to_string(),
            "could not determine OS configuration directory"
        );
        let io = PlatformError::from(io::Error::other("disk full"));
        assert!(io.to_string().contains("disk full"));
    }
}
