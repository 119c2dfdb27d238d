use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub struct CliOutput {
    pub stdout: String,
    #[allow(dead_code)]
    pub stderr: String,
}

/// Runs `flowmatch_cli` against a private data directory.
pub struct CliHarness {
    home: TempDir,
}

impl CliHarness {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Seeds `config.json` before the shell starts.
    #[allow(dead_code)]
    pub fn write_config(&self, json: &str) {
        fs::write(self.home().join("config.json"), json).expect("write config");
    }

    #[allow(dead_code)]
    pub fn run_script(&self, script: &str) -> CliOutput {
        let mut cmd = Command::cargo_bin("flowmatch_cli").expect("binary exists");
        cmd.env("FLOWMATCH_HOME", self.home())
            .env("FLOWMATCH_CLI_SCRIPT", "1")
            .env_remove("RUST_LOG")
            .write_stdin(script.to_string());
        let output = cmd.output().expect("run script CLI");
        if !output.status.success() {
            panic!(
                "script CLI failed: status={}\nstdout:\n{}\nstderr:\n{}",
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
