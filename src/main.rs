//! Dispatcher entry point. Installed once, invoked through per-app symlinks.

use anyhow::{Context, Result};
use clap::Parser;
use compose_helper::cli::{AppIdentity, Invocation};
use compose_helper::process::UNRECOGNIZED_EXIT_CODE;
use compose_helper::{config, dispatch, logging, process, HelperError};
use tracing::{debug, error};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let invocation = Invocation::parse();

    let code = match run(&invocation).await {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<HelperError>() {
            Some(HelperError::UnrecognizedCommand(_)) => {
                error!("{err}");
                UNRECOGNIZED_EXIT_CODE
            }
            _ => {
                error!("{err:#}");
                1
            }
        },
    };

    std::process::exit(code);
}

async fn run(invocation: &Invocation) -> Result<i32> {
    let app = match AppIdentity::from_process() {
        Ok(app) => app,
        Err(err) => {
            logging::init(invocation.debug);
            return Err(err.into());
        }
    };

    let config_path = config::config_file_path();
    let loaded = config::load(&config_path, app.name());
    logging::init(invocation.debug || loaded.as_ref().is_ok_and(|c| c.debug));
    let app_config = loaded?;
    debug!(?app_config, config = %config_path.display(), "loaded app config");

    let orchestrator = config::resolve_orchestrator_binary();
    let resolved = dispatch::resolve(&app, invocation, &app_config, &orchestrator)?;
    debug!(service = ?resolved.service, "Running: {}", resolved.display_line());

    let code = process::execute(&resolved)
        .await
        .with_context(|| format!("running {} for {app}", invocation.command))?;
    debug!(code, "command finished");
    Ok(code)
}
