//! Translation of an invocation into the orchestrator command line.
//!
//! Commands come from a closed table: the compose subcommands that are passed
//! straight through, plus a couple of built-in shortcuts (`ssh`, `migrate`).
//! Anything else is rejected before a compose file is even looked up.

use crate::cli::{AppIdentity, Invocation};
use crate::config::AppConfig;
use crate::error::{HelperError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";
pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const MIGRATE_SERVICE: &str = "migrate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeCommand {
    Build,
    Bundle,
    Config,
    Create,
    Down,
    Events,
    Exec,
    Help,
    Kill,
    Logs,
    Pause,
    Port,
    Ps,
    Pull,
    Push,
    Restart,
    Rm,
    Run,
    Scale,
    Start,
    Stop,
    Unpause,
    Up,
    Version,
}

impl ComposeCommand {
    pub const ALL: [ComposeCommand; 24] = [
        ComposeCommand::Build,
        ComposeCommand::Bundle,
        ComposeCommand::Config,
        ComposeCommand::Create,
        ComposeCommand::Down,
        ComposeCommand::Events,
        ComposeCommand::Exec,
        ComposeCommand::Help,
        ComposeCommand::Kill,
        ComposeCommand::Logs,
        ComposeCommand::Pause,
        ComposeCommand::Port,
        ComposeCommand::Ps,
        ComposeCommand::Pull,
        ComposeCommand::Push,
        ComposeCommand::Restart,
        ComposeCommand::Rm,
        ComposeCommand::Run,
        ComposeCommand::Scale,
        ComposeCommand::Start,
        ComposeCommand::Stop,
        ComposeCommand::Unpause,
        ComposeCommand::Up,
        ComposeCommand::Version,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeCommand::Build => "build",
            ComposeCommand::Bundle => "bundle",
            ComposeCommand::Config => "config",
            ComposeCommand::Create => "create",
            ComposeCommand::Down => "down",
            ComposeCommand::Events => "events",
            ComposeCommand::Exec => "exec",
            ComposeCommand::Help => "help",
            ComposeCommand::Kill => "kill",
            ComposeCommand::Logs => "logs",
            ComposeCommand::Pause => "pause",
            ComposeCommand::Port => "port",
            ComposeCommand::Ps => "ps",
            ComposeCommand::Pull => "pull",
            ComposeCommand::Push => "push",
            ComposeCommand::Restart => "restart",
            ComposeCommand::Rm => "rm",
            ComposeCommand::Run => "run",
            ComposeCommand::Scale => "scale",
            ComposeCommand::Start => "start",
            ComposeCommand::Stop => "stop",
            ComposeCommand::Unpause => "unpause",
            ComposeCommand::Up => "up",
            ComposeCommand::Version => "version",
        }
    }

    /// Subcommands whose first positional is the service.
    pub fn is_service_specific(&self) -> bool {
        matches!(
            self,
            ComposeCommand::Exec | ComposeCommand::Run | ComposeCommand::Scale
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Compose(ComposeCommand),
    /// Interactive shell inside a running service.
    Shell,
    /// One-shot run of the `migrate` service.
    Migrate,
}

impl Command {
    pub fn parse(name: &str) -> Option<Command> {
        match name {
            "ssh" => Some(Command::Shell),
            "migrate" => Some(Command::Migrate),
            other => ComposeCommand::ALL
                .iter()
                .find(|c| c.as_str() == other)
                .copied()
                .map(Command::Compose),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Service named on the command line, if any.
    pub service: Option<String>,
}

impl ResolvedCommand {
    /// Space-joined command line, for logs.
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `--compose` wins verbatim; otherwise `<project_dir>/docker-compose.yml`,
/// with a relative project dir taken against the current directory.
pub fn resolve_compose_file(
    app: &AppIdentity,
    invocation: &Invocation,
    config: &AppConfig,
) -> Result<PathBuf> {
    if let Some(compose) = &invocation.compose_override {
        return Ok(compose.clone());
    }

    let app_dir = std::path::absolute(config.project_dir()?)?;
    if !app_dir.is_dir() {
        return Err(HelperError::AppDirNotFound {
            app: app.name().to_string(),
            path: app_dir,
        });
    }
    Ok(app_dir.join(COMPOSE_FILE_NAME))
}

/// `-s/--service` when non-empty.
pub fn explicit_service(invocation: &Invocation) -> Option<String> {
    invocation
        .service_override
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `-s/--service`, then the configured default.
pub fn resolve_service(invocation: &Invocation, config: &AppConfig) -> Option<String> {
    explicit_service(invocation).or_else(|| config.default_service.clone())
}

pub fn resolve(
    app: &AppIdentity,
    invocation: &Invocation,
    config: &AppConfig,
    orchestrator: &str,
) -> Result<ResolvedCommand> {
    let command = Command::parse(&invocation.command)
        .ok_or_else(|| HelperError::UnrecognizedCommand(invocation.command.clone()))?;

    let compose_file = resolve_compose_file(app, invocation, config)?;
    let resolved_service = resolve_service(invocation, config);
    debug!(%app, ?command, compose = %compose_file.display(), service = ?resolved_service, "resolving");

    let mut args = vec![
        "-f".to_string(),
        compose_file.to_string_lossy().into_owned(),
    ];
    let trailing = invocation.trailing_args.iter().cloned();

    // The service that ends up on the command line, if any.
    let placed = match command {
        Command::Compose(sub) => {
            args.push(sub.as_str().to_string());
            if sub.is_service_specific() {
                args.extend(resolved_service.clone());
                args.extend(trailing);
                resolved_service
            } else {
                args.extend(trailing);
                // Only an explicit -s is appended; the default service never is.
                let explicit = explicit_service(invocation);
                args.extend(explicit.clone());
                explicit
            }
        }
        Command::Shell => {
            let target = resolved_service.ok_or(HelperError::NoServiceSelected)?;
            args.push(ComposeCommand::Exec.as_str().to_string());
            args.push(target.clone());
            if invocation.trailing_args.is_empty() {
                args.push(DEFAULT_SHELL.to_string());
            } else {
                args.extend(trailing);
            }
            Some(target)
        }
        Command::Migrate => {
            args.push(ComposeCommand::Run.as_str().to_string());
            args.push(MIGRATE_SERVICE.to_string());
            args.extend(trailing);
            Some(MIGRATE_SERVICE.to_string())
        }
    };

    Ok(ResolvedCommand {
        program: orchestrator.to_string(),
        args,
        service: placed,
    })
}

/// Compose file path for an app without an invocation, used by the registration summary.
pub fn default_compose_file(project_dir: &Path) -> PathBuf {
    project_dir.join(COMPOSE_FILE_NAME)
}
