// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! External command execution.
//!
//! Every workflow step that shells out (git, cmake, ninja, ctest) goes through
//! the [`CommandRunner`] trait so the steps can be exercised without the
//! actual tools installed.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Errors that can occur while running external commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started
    #[error("Could not run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully
    #[error("'{command}' failed with {status}{}", stderr_suffix(.stderr))]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// A required program is not installed
    #[error("Could not run '{program}', please install {package}")]
    Missing { program: String, package: String },

    /// The program wrote non UTF-8 output
    #[error("Output of '{command}' is not valid UTF-8")]
    InvalidOutput { command: String },

    /// Preparing a working directory failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl CommandError {
    /// Build a [`CommandError::Io`].
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        CommandError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CommandError>;

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name, resolved through `PATH`.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
    /// Working directory, or the current one.
    pub cwd: Option<PathBuf>,
    /// Variables added to the child's environment only.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Start describing a command.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// The command line, for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        for (key, value) in &self.env {
            command.env(key, value);
        }
        command
    }
}

/// Runs external commands.
#[cfg_attr(test, automock)]
pub trait CommandRunner {
    /// Run to completion with inherited stdio; fail on a non-zero exit.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Run to completion and return captured stdout; fail on a non-zero exit.
    fn output(&self, invocation: &Invocation) -> Result<String>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        debug!(command = %invocation.command_line(), cwd = ?invocation.cwd, "Running command");
        let status = invocation
            .to_command()
            .status()
            .map_err(|source| CommandError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(CommandError::Failed {
                command: invocation.command_line(),
                status: status.to_string(),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    fn output(&self, invocation: &Invocation) -> Result<String> {
        debug!(command = %invocation.command_line(), cwd = ?invocation.cwd, "Capturing command output");
        let output = invocation
            .to_command()
            .output()
            .map_err(|source| CommandError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(CommandError::Failed {
                command: invocation.command_line(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| CommandError::InvalidOutput {
            command: invocation.command_line(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let invocation = Invocation::new("git")
            .args(["reset", "--hard"])
            .arg("master")
            .current_dir("/src/ITK")
            .env("KEY", "value");
        assert_eq!(invocation.command_line(), "git reset --hard master");
        assert_eq!(invocation.cwd, Some(PathBuf::from("/src/ITK")));
        assert_eq!(invocation.env, vec![("KEY".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_failed_error_message_includes_stderr() {
        let err = CommandError::Failed {
            command: "git rev-parse HEAD".to_string(),
            status: "exit status: 128".to_string(),
            stderr: "fatal: not a git repository\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'git rev-parse HEAD' failed with exit status: 128: fatal: not a git repository"
        );
    }

    #[test]
    fn test_spawn_failure_for_unknown_program() {
        let runner = SystemCommandRunner;
        let err = runner
            .run(&Invocation::new("itk-perf-definitely-not-a-program"))
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
