#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Minimal settings document pointing at unreachable endpoints; good enough
/// for runs that never open a connection.
pub fn settings_json() -> &'static str {
    r#"{
        "warehouse": {
            "host": "localhost",
            "port": 5439,
            "user": "loader",
            "password": "pw",
            "database": "dev",
            "grant_role": "reporting"
        },
        "upload": {
            "access_key": "AK",
            "secret_key": "SK",
            "bucket": "staging",
            "region": "us-east-1"
        },
        "copy": {
            "access_key": "AK2",
            "secret_key": "SK2",
            "bucket": "load-source"
        }
    }"#
}
