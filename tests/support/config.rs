use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Config file in its own temporary directory.
pub struct TempConfig {
    dir: TempDir,
    path: PathBuf,
}

impl TempConfig {
    pub fn write(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write temp config");
        Self { dir, path }
    }

    /// Config pointing its database into the temp directory.
    pub fn with_database(extra: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db = dir.path().join("lydwatch.db");
        let contents = format!("database = {:?}\n{extra}", db.to_string_lossy());
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write temp config");
        Self { dir, path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}
