// Copyright 2025 ITK Performance Benchmarking Contributors
// SPDX-License-Identifier: Apache-2.0

//! Required external programs.

use super::command::{CommandError, CommandRunner, Invocation, Result};
use tracing::debug;

/// Programs a benchmark run needs, with the package that provides each.
pub const REQUIRED_PROGRAMS: &[(&str, &str)] = &[
    ("git", "Git"),
    ("cmake", "CMake"),
    ("ctest", "CMake"),
    ("ninja", "the Ninja build tool"),
];

/// Check that every program in [`REQUIRED_PROGRAMS`] answers `--version`.
///
/// Returns [`CommandError::Missing`] for the first one that does not.
pub fn check_required_programs<R>(runner: &R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    for (program, package) in REQUIRED_PROGRAMS {
        let version = runner
            .output(&Invocation::new(*program).arg("--version"))
            .map_err(|_| CommandError::Missing {
                program: program.to_string(),
                package: package.to_string(),
            })?;
        debug!(
            program,
            version = version.lines().next().unwrap_or_default(),
            "Found required program"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::command::MockCommandRunner;

    #[test]
    fn test_all_programs_present() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .withf(|inv| inv.args == ["--version"])
            .times(REQUIRED_PROGRAMS.len())
            .returning(|inv| Ok(format!("{} version 1.0\n", inv.program)));

        assert!(check_required_programs(&runner).is_ok());
    }

    #[test]
    fn test_missing_program_names_package() {
        let mut runner = MockCommandRunner::new();
        runner.expect_output().returning(|inv| {
            if inv.program == "ninja" {
                Err(CommandError::Spawn {
                    program: inv.program.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            } else {
                Ok("ok".to_string())
            }
        });

        let err = check_required_programs(&runner).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not run 'ninja', please install the Ninja build tool"
        );
    }
}
