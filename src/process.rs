use crate::dispatch::ResolvedCommand;
use crate::error::{HelperError, Result};
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code used when the command is not one we know how to run.
pub const UNRECOGNIZED_EXIT_CODE: i32 = -1;

/// Run the command on the current terminal and return its exit code.
///
/// A Ctrl-C reaches the child through the terminal's process group; here it
/// only interrupts the wait, which is resumed until the child is gone.
pub async fn execute(resolved: &ResolvedCommand) -> Result<i32> {
    let mut interrupts = InterruptListener::install()?;

    let mut child = Command::new(&resolved.program)
        .args(&resolved.args)
        .spawn()
        .map_err(|source| HelperError::SpawnFailure {
            program: resolved.program.clone(),
            source,
        })?;
    debug!(pid = ?child.id(), "spawned {}", resolved.program);

    let status = loop {
        tokio::select! {
            status = child.wait() => break status?,
            _ = interrupts.recv() => {
                debug!("interrupt received, waiting for {} to exit", resolved.program);
            }
        }
    };

    Ok(exit_code(status))
}

#[cfg(unix)]
struct InterruptListener(tokio::signal::unix::Signal);

#[cfg(unix)]
impl InterruptListener {
    // Registered before spawning so an early Ctrl-C cannot kill the dispatcher.
    // Handlers (unlike SIG_IGN) are reset on exec, so the child keeps the default.
    fn install() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self(signal(SignalKind::interrupt())?))
    }

    async fn recv(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
struct InterruptListener;

#[cfg(not(unix))]
impl InterruptListener {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
pub fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    if let Some(code) = status.code() {
        return code;
    }
    match status.signal() {
        Some(signo) => {
            match nix::sys::signal::Signal::try_from(signo) {
                Ok(sig) => warn!("child terminated by {sig}"),
                Err(_) => warn!("child terminated by signal {signo}"),
            }
            128 + signo
        }
        None => 1,
    }
}

#[cfg(not(unix))]
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(if status.success() { 0 } else { 1 })
}
