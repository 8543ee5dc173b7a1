use std::fs;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncWriteExt;

mod data;

pub use data::{bzip2_bytes, generate_image, gzip_bytes, xz_bytes, SAMPLE_IMAGE};

/// Path of the `rdd` binary built for this test run.
const RDD_BIN: &str = env!("CARGO_BIN_EXE_rdd");

/// Output from running the binary
pub struct Output {
    pub status: ExitStatus,
    pub stdout_raw: Vec<u8>,
    pub stdout: String,
    pub stderr: String,
}

/// Shared test fixture keeping filesystem interactions isolated
pub struct Fixture {
    root_dir: tempfile::TempDir,
}

impl Fixture {
    /// Create an empty fixture
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            root_dir: tempfile::TempDir::new().unwrap(),
        }
    }

    /// Create fixture with single file
    ///
    /// # Panics
    ///
    /// Panics if the fixture file cannot be written.
    pub fn with_file(name: &str, contents: &[u8]) -> Self {
        let fixture = Self::new();
        fixture.write(name, contents);
        fixture
    }

    /// Write (or overwrite) a file in the fixture
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, name: &str, contents: &[u8]) {
        fs::write(self.root_dir.path().join(name), contents).unwrap();
    }

    /// Get full path for a file in the fixture
    pub fn path(&self, name: &str) -> String {
        format!("{}/{}", self.root_dir.path().display(), name)
    }

    /// Check if a file exists in the fixture
    pub fn file_exists(&self, name: &str) -> bool {
        self.root_dir.path().join(name).exists()
    }

    /// Read a fixture file, empty if it does not exist
    pub fn read(&self, name: &str) -> Vec<u8> {
        fs::read(self.root_dir.path().join(name)).unwrap_or_default()
    }

    /// Assert that a file has the expected contents
    ///
    /// # Panics
    ///
    /// Panics if the contents differ.
    pub fn assert_file(&self, name: &str, expected: &[u8]) {
        let actual = self.read(name);
        assert_eq!(actual.len(), expected.len(), "length of {name}");
        assert!(actual == expected, "contents of {name}");
    }

    pub fn root_dir_path(&self) -> &Path {
        self.root_dir.path()
    }

    /// Run `rdd` with the specified arguments
    pub async fn run(&self, args: &[&str]) -> Output {
        self.run_with_stdin(args, None).await
    }

    /// Run `rdd` feeding `stdin` to its standard input
    ///
    /// # Panics
    ///
    /// Panics if the process cannot be spawned or awaited.
    pub async fn run_with_stdin(&self, args: &[&str], stdin: Option<&[u8]>) -> Output {
        let mut child = tokio::process::Command::new(RDD_BIN)
            .args(args)
            .current_dir(self.root_dir.path())
            .env_remove("RUST_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .unwrap();

        if let Some(bytes) = stdin {
            if let Some(ref mut pipe) = child.stdin {
                pipe.write_all(bytes).await.unwrap_or_else(|err| {
                    // rdd may exit before reading its input.
                    if err.kind() == std::io::ErrorKind::BrokenPipe {
                        return;
                    }
                    panic!("failed write to stdin ({} bytes): {err}", bytes.len());
                });
            }
        }

        // Drop stdin to send EOF to the child process
        drop(child.stdin.take());

        let raw_output = child.wait_with_output().await.unwrap();
        Output {
            status: raw_output.status,
            stdout: String::from_utf8_lossy(&raw_output.stdout).into_owned(),
            stdout_raw: raw_output.stdout,
            stderr: String::from_utf8_lossy(&raw_output.stderr).into_owned(),
        }
    }
}
