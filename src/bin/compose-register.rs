//! Registers an application with the dispatcher.

use anyhow::{Context, Result};
use clap::Parser;
use compose_helper::cli::RegisterArgs;
use compose_helper::register::{self, LinkOutcome, Registration};
use compose_helper::{config, logging};

fn main() -> Result<()> {
    let args = RegisterArgs::parse();
    logging::init(args.debug);

    let target = match args.target {
        Some(t) => t,
        None => register::default_target().context("locating the compose-helper binary")?,
    };

    let reg = Registration {
        app: args.app,
        project_dir: args.path,
        default_service: args.default_service,
        bin_dir: args.bin_dir,
        target,
        config_path: config::config_file_path(),
    };

    let report = register::register(&reg).with_context(|| format!("registering {}", reg.app))?;

    if report.link_outcome == LinkOutcome::Created {
        println!("Installed {}", report.link.display());
    }
    println!("Setting configuration for {}:", reg.app);
    for (k, v) in &report.entries {
        println!("{k} = {v}");
    }
    Ok(())
}
