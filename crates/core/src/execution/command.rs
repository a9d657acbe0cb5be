//! Command execution utilities
//!
//! Every recipe line and every variable lookup goes through the same shell
//! invocation so that quoting, working directory and environment behave alike.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use colored::*;
use tokio::process::Command;
use tracing::debug;

use crate::types::{ChoreError, ChoreResult};

/// Build a `sh -c` invocation of `line` in `root` with `env` layered on top of
/// the inherited process environment
pub fn shell_command(line: &str, root: &Path, env: &BTreeMap<String, String>) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(line).current_dir(root).envs(env);
    command
}

/// Runs the command lines of one recipe
pub struct CommandExecutor<'a> {
    root: &'a Path,
    env: BTreeMap<String, String>,
    echo: bool,
    dry_run: bool,
}

impl<'a> CommandExecutor<'a> {
    pub fn new(root: &'a Path, env: BTreeMap<String, String>) -> Self {
        Self {
            root,
            env,
            echo: true,
            dry_run: false,
        }
    }

    /// Print each line to stderr before running it
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Print lines without running them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute a single shell command, failing on a non-zero exit
    pub async fn execute_shell_command(&self, line: &str) -> ChoreResult<()> {
        if self.echo || self.dry_run {
            eprintln!("{}", line.bold());
        }
        if self.dry_run {
            return Ok(());
        }

        debug!(command = line, root = %self.root.display(), "spawning");

        let status = shell_command(line, self.root, &self.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                ChoreError::Recipe(format!("Failed to execute command '{}': {}", line, e))
            })?;

        if !status.success() {
            return Err(ChoreError::CommandFailed {
                command: line.to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_command_runs_in_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), BTreeMap::new()).with_echo(false);

        executor.execute_shell_command("echo hi > out.txt").await.unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "hi\n");
    }

    #[tokio::test]
    async fn test_env_is_exported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut env = BTreeMap::new();
        env.insert("CARGO_TARGET_DIR".to_string(), "target/nightly".to_string());
        let executor = CommandExecutor::new(temp_dir.path(), env).with_echo(false);

        executor
            .execute_shell_command("printf '%s' \"$CARGO_TARGET_DIR\" > env.txt")
            .await
            .unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("env.txt")).unwrap();
        assert_eq!(written, "target/nightly");
    }

    #[tokio::test]
    async fn test_failure_carries_exit_code() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), BTreeMap::new()).with_echo(false);

        let err = executor.execute_shell_command("exit 3").await.unwrap_err();
        match err {
            ChoreError::CommandFailed { command, code } => {
                assert_eq!(command, "exit 3");
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_dry_run_does_not_execute() {
        let temp_dir = tempfile::tempdir().unwrap();
        let executor = CommandExecutor::new(temp_dir.path(), BTreeMap::new()).with_dry_run(true);

        executor.execute_shell_command("touch created").await.unwrap();

        assert!(!temp_dir.path().join("created").exists());
    }
}
