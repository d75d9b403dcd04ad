use crate::error::{HelperError, Result};
use clap::Parser;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";
pub const DEFAULT_SERVICE_ON_REGISTER: &str = "app";

/// Arguments of a dispatcher run, e.g. `myapp exec -s web -- bash -l`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    about = "Run docker-compose commands against a registered application",
    after_help = "Use `--` to pass arguments that collide with the options above."
)]
pub struct Invocation {
    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,

    #[arg(short = 'c', long = "compose", value_name = "PATH", help = "Path to docker-compose file")]
    pub compose_override: Option<PathBuf>,

    #[arg(
        short = 's',
        long = "service",
        value_name = "NAME",
        help = "Compose service to target. Defaults to 'default_service' in the config file"
    )]
    pub service_override: Option<String>,

    #[arg(help = "Command to run on the app")]
    pub command: String,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ARGS",
        help = "Additional arguments for the command"
    )]
    pub trailing_args: Vec<String>,
}

/// Arguments of `compose-register`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "compose-register",
    version,
    about = "Register an application: link a binary named after it and write its config section"
)]
pub struct RegisterArgs {
    #[arg(help = "Application name; becomes the binary name")]
    pub app: String,

    #[arg(default_value = ".", help = "Path to the project directory")]
    pub path: PathBuf,

    #[arg(
        long = "default",
        value_name = "SERVICE",
        default_value = DEFAULT_SERVICE_ON_REGISTER,
        help = "Default service for run and exec commands"
    )]
    pub default_service: String,

    #[arg(long, value_name = "DIR", default_value = DEFAULT_BIN_DIR, help = "Where to create the binary link")]
    pub bin_dir: PathBuf,

    #[arg(long, value_name = "PATH", help = "Dispatcher binary to link to [default: compose-helper next to this binary]")]
    pub target: Option<PathBuf>,

    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,
}

/// Which application this process serves, taken from the name it was invoked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity(String);

impl AppIdentity {
    pub fn from_invocation_path(argv0: &OsStr) -> Result<Self> {
        let name = Path::new(argv0)
            .file_name()
            .and_then(OsStr::to_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| HelperError::InvalidInvocation(argv0.to_string_lossy().into_owned()))?;
        Ok(AppIdentity(name.to_string()))
    }

    pub fn from_process() -> Result<Self> {
        let argv0 = std::env::args_os()
            .next()
            .ok_or_else(|| HelperError::InvalidInvocation("empty argument list".to_string()))?;
        Self::from_invocation_path(&argv0)
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Invocation {
        Invocation::try_parse_from(std::iter::once("myapp").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn options_before_command() {
        let inv = parse(&["-s", "web", "--compose", "/tmp/x.yml", "logs"]);
        assert_eq!(inv.command, "logs");
        assert_eq!(inv.service_override.as_deref(), Some("web"));
        assert_eq!(inv.compose_override, Some(PathBuf::from("/tmp/x.yml")));
        assert!(inv.trailing_args.is_empty());
    }

    #[test]
    fn options_after_command_then_trailing() {
        let inv = parse(&["exec", "--service", "db", "--", "psql", "-U", "postgres"]);
        assert_eq!(inv.command, "exec");
        assert_eq!(inv.service_override.as_deref(), Some("db"));
        assert_eq!(inv.trailing_args, ["psql", "-U", "postgres"]);
    }

    #[test]
    fn hyphen_args_pass_through() {
        let inv = parse(&["logs", "-f", "--tail", "10"]);
        assert_eq!(inv.trailing_args, ["-f", "--tail", "10"]);
        assert_eq!(inv.service_override, None);
    }

    #[test]
    fn version_flag_is_forwarded() {
        let inv = parse(&["logs", "--version"]);
        assert_eq!(inv.command, "logs");
        assert_eq!(inv.trailing_args, ["--version"]);
    }

    #[test]
    fn everything_after_first_trailing_arg_is_verbatim() {
        let inv = parse(&["ssh", "bash", "-c", "echo hi"]);
        assert_eq!(inv.compose_override, None);
        assert_eq!(inv.trailing_args, ["bash", "-c", "echo hi"]);
    }

    #[test]
    fn command_is_required() {
        assert!(Invocation::try_parse_from(["myapp"]).is_err());
    }

    #[test]
    fn register_defaults() {
        let args = RegisterArgs::try_parse_from(["compose-register", "shop"]).unwrap();
        assert_eq!(args.app, "shop");
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.default_service, "app");
        assert_eq!(args.bin_dir, PathBuf::from(DEFAULT_BIN_DIR));
        assert_eq!(args.target, None);
    }

    #[test]
    fn identity_is_file_name_of_argv0() {
        let id = AppIdentity::from_invocation_path(OsStr::new("/usr/local/bin/myapp")).unwrap();
        assert_eq!(id.name(), "myapp");
        assert_eq!(
            AppIdentity::from_invocation_path(OsStr::new("shop")).unwrap().to_string(),
            "shop"
        );
        assert!(AppIdentity::from_invocation_path(OsStr::new("/")).is_err());
    }
}
