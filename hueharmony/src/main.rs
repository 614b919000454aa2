#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! `hueharmony` command-line entry point.

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use hueharmony::inbound::cli::{Cli, run};
use hueharmony::{HueHarmonySettings, Shell};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json);

    let settings = HueHarmonySettings::load_from_iter([std::ffi::OsString::from("hueharmony")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let shell = Shell::from_settings(&settings, Arc::new(DefaultClock))
        .wrap_err("failed to assemble adapters")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;

    match runtime.block_on(run(&cli, &shell)) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.message());
            std::process::exit(1);
        }
    }
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        warn!(error = %e, "tracing init failed");
    }
}
