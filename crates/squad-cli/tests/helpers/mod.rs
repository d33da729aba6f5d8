#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("squad").expect("Failed to find squad binary");

        // Keep any squad.toml in the developer's tree out of the run
        cmd.current_dir(self.temp_dir.path());
        cmd.env("SQUAD_DATABASE_PATH", &self.db_path);
        cmd.env_remove("SQUAD_LOG");

        cmd
    }

    pub fn db_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs with `--json` and parses stdout
    pub fn run_json(&self, args: &[&str]) -> Value {
        let output = self
            .command()
            .arg("--json")
            .args(args)
            .output()
            .expect("Failed to run squad");
        assert!(
            output.status.success(),
            "squad {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout was not JSON")
    }

    /// Adds a schedule and returns the created root's id
    pub fn add(&self, args: &[&str]) -> String {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let created = self.run_json(&full);
        created["root"]["id"]
            .as_str()
            .expect("created root has an id")
            .to_string()
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Weekly practice with four occurrences: Jan 1, 8, 15 and 22
    pub fn weekly_practice_args() -> Vec<&'static str> {
        vec![
            "Practice",
            "--date", "2024-01-01",
            "--start", "18:00",
            "--venue", "Gym A",
            "--every", "weekly",
            "--until", "2024-01-22",
        ]
    }

    pub fn one_off_args() -> Vec<&'static str> {
        vec!["Friendly match", "--date", "2024-06-01", "--start", "10:30"]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains schedule table headers
    pub fn has_schedule_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Date"))
            .and(predicate::str::contains("Venue"))
    }

    /// Predicate to check if output indicates successful creation
    pub fn schedule_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Created"))
    }

    /// Predicate to check for empty result set
    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No schedules found")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
    }
}
