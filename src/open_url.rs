use anyhow::{Context, Result, anyhow};
use std::process::Command;
use std::thread;
use tracing::{debug, warn};

/// Something that can show a URL to the user.
pub trait Browser {
    /// Fire and forget; failures are the implementation's to report.
    fn open(&self, url: &str);
}

pub struct SystemBrowser {
    command: Option<String>,
}

impl SystemBrowser {
    pub fn new(command: Option<String>) -> Self {
        SystemBrowser { command }
    }
}

impl Browser for SystemBrowser {
    fn open(&self, url: &str) {
        match open_url(url, self.command.as_deref()) {
            Ok(()) => debug!(%url, "opened in browser"),
            Err(err) => warn!(%url, error = %err, "failed to open browser"),
        }
    }
}

pub fn open_url(url: &str, command: Option<&str>) -> Result<()> {
    if let Some(cmd) = command {
        let mut launcher = configured_command(cmd)?;
        launcher.arg(url);
        return spawn_reaped(launcher).with_context(|| format!("failed to run {}", cmd));
    }
    // Try the system default launchers in order
    for launcher in open::commands(url) {
        if spawn_reaped(launcher).is_ok() {
            return Ok(());
        }
    }
    // Fallback: try firefox directly
    let mut firefox = Command::new("firefox");
    firefox.arg(url);
    spawn_reaped(firefox).context("no default browser and firefox is not available")
}

/// Builds a command from a config value such as `firefox --private-window`.
fn configured_command(cmd: &str) -> Result<Command> {
    let mut parts = cmd.split_whitespace();
    let program = parts.next().ok_or_else(|| anyhow!("open_command is empty"))?;
    let mut command = Command::new(program);
    command.args(parts);
    Ok(command)
}

// The launcher is waited on from a background thread so it never lingers
// as a zombie for the rest of the session.
fn spawn_reaped(mut command: Command) -> Result<()> {
    let mut child = command.spawn()?;
    thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => debug!(%status, "browser launcher exited"),
        Ok(_) => {}
        Err(err) => debug!(error = %err, "failed to wait for browser launcher"),
    });
    Ok(())
}
