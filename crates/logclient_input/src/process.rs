use std::{path::PathBuf, process::Stdio};

use tokio::process::{Child, ChildStdout, Command};

use crate::StartError;

/// Frozen description of the producer process.
///
/// Built once from the validated configuration; `spawn` derives a fresh
/// command from it so the spec itself stays immutable.
#[derive(Clone, Debug)]
pub(crate) struct CommandSpec {
    pub(crate) binary: PathBuf,
    pub(crate) endpoint: String,
    pub(crate) log_filter: String,
}

impl CommandSpec {
    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(format!("--gRPC={}", self.endpoint))
            .arg(format!("--logFilter={}", self.log_filter))
            .arg("--json")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Launches the producer and hands back its stdout pipe.
    ///
    /// A child that comes up without a stdout pipe is killed before the error
    /// returns, so activation failures never leak a running process.
    pub(crate) fn spawn(&self) -> Result<(Child, ChildStdout), StartError> {
        let mut child = self.command().spawn().map_err(|source| StartError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;
        match child.stdout.take() {
            Some(stdout) => Ok((child, stdout)),
            None => {
                let _ = child.start_kill();
                Err(StartError::StdoutUnavailable)
            }
        }
    }
}
