// src/utils/command.rs

use std::process::Command;

use tracing::{debug, error};

use crate::errors::CommandError;

/// Runs a single textual command line and returns its captured standard output.
///
/// Implementations perform no retries and expose no cancellation: the caller blocks
/// until the command has finished.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &str) -> Result<String, CommandError>;
}

/// Executes commands through the platform shell (`cmd.exe` on Windows, `sh` elsewhere).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }

    #[cfg(windows)]
    fn build(command: &str) -> Command {
        use std::os::windows::process::CommandExt;

        use windows::Win32::System::Threading::CREATE_NO_WINDOW;

        let mut cmd = Command::new("cmd.exe");
        // The command line is handed over verbatim so that embedded quotes reach reg.exe/sc.exe intact.
        cmd.raw_arg(format!("/d /s /c \"{}\"", command))
            .creation_flags(CREATE_NO_WINDOW.0);
        cmd
    }

    #[cfg(not(windows))]
    fn build(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str) -> Result<String, CommandError> {
        debug!("Executing command: {}", command);

        let output = Self::build(command)
            .output()
            .map_err(|e| CommandError::Launch {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(
            "Command '{}' exited with {:?}: {}",
            command,
            output.status.code(),
            stderr.trim()
        );
        Err(CommandError::Failed {
            command: command.to_string(),
            message: format!("Command failed: {}\n{}", command, stderr.trim())
                .trim()
                .to_string(),
            output: if stdout.trim().is_empty() {
                None
            } else {
                Some(stdout)
            },
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every command line and answers from a list of prefix rules.
    /// Later rules take precedence; unmatched commands succeed with empty output.
    #[derive(Default)]
    pub struct FakeExecutor {
        calls: Mutex<Vec<String>>,
        rules: Mutex<Vec<(String, Result<String, CommandError>)>>,
    }

    impl FakeExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, prefix: &str, stdout: &str) {
            self.rules
                .lock()
                .unwrap()
                .push((prefix.to_string(), Ok(stdout.to_string())));
        }

        pub fn fail(&self, prefix: &str, message: &str) {
            self.rules.lock().unwrap().push((
                prefix.to_string(),
                Err(CommandError::Failed {
                    command: prefix.to_string(),
                    message: message.to_string(),
                    output: None,
                }),
            ));
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c.starts_with(prefix))
                .collect()
        }
    }

    impl CommandExecutor for FakeExecutor {
        fn execute(&self, command: &str) -> Result<String, CommandError> {
            self.calls.lock().unwrap().push(command.to_string());
            self.rules
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(prefix, _)| command.starts_with(prefix.as_str()))
                .map(|(_, result)| result.clone())
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{testing::FakeExecutor, *};

    #[test]
    fn test_fake_executor_latest_rule_wins() {
        let executor = FakeExecutor::new();
        executor.respond("sc query", "STATE : 4 RUNNING");
        executor.fail("sc query", "service missing");

        let result = executor.execute("sc query \"DiagTrack\"");
        assert!(result.is_err());
        assert_eq!(executor.calls(), vec!["sc query \"DiagTrack\"".to_string()]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_system_executor_captures_stdout_and_failure() {
        let executor = SystemCommandExecutor::new();
        let out = executor.execute("echo hello").expect("echo should succeed");
        assert_eq!(out.trim(), "hello");

        let err = executor
            .execute("echo oops 1>&2; exit 3")
            .expect_err("non-zero exit should fail");
        match err {
            CommandError::Failed { message, .. } => assert!(message.contains("oops")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
