//! Fire-and-forget process plumbing.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::Result;
use crate::host::{ActivationSink, ProcessLauncher};

/// Starts processes detached from the terminal, without waiting on them.
/// Each child is reaped by a background thread once it exits.
#[derive(Debug, Default)]
pub struct CommandLauncher;

impl CommandLauncher {
    fn start(command: &mut Command) -> Result<u32> {
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let pid = child.id();
        debug!(pid, ?command, "spawned");
        thread::spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "child exited"),
            Err(e) => warn!(pid, "failed to wait on child: {e}"),
        });
        Ok(pid)
    }
}

impl ProcessLauncher for CommandLauncher {
    fn spawn(&mut self, executable: &Path, working_dir: &Path) -> Result<()> {
        Self::start(Command::new(executable).current_dir(working_dir)).map(|_| ())
    }
}

/// Sends activated paths to the plumber through the `plumb` command.
#[derive(Debug)]
pub struct PlumbSink {
    plumber: PathBuf,
    source: String,
}

impl PlumbSink {
    pub fn new(plumber: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            plumber: plumber.into(),
            source: source.into(),
        }
    }

    /// Build the plumb invocation for one message.
    pub fn command(&self, path: &Path, root: &Path) -> Command {
        let mut command = Command::new(&self.plumber);
        command
            .arg("-s")
            .arg(&self.source)
            .arg("-w")
            .arg(root)
            .arg("-t")
            .arg("text")
            .arg(path)
            .current_dir(root);
        command
    }
}

impl ActivationSink for PlumbSink {
    fn send(&mut self, path: &Path, root: &Path) -> Result<()> {
        CommandLauncher::start(&mut self.command(path, root)).map(|_| ())
    }
}
