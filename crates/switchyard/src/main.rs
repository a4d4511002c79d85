// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard - a policy-driven LLM request router.
//!
//! This is the binary entry point for the Switchyard router.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod error;
mod route;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switchyard_config::SwitchyardConfig;

use crate::error::CliError;

/// Switchyard - a policy-driven LLM request router.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard search path.
    #[arg(long, short, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Validate the configuration and print a policy summary.
    Check,
    /// Route a single chat-completion request and print the result.
    Route {
        /// JSON request file, or `-` for stdin.
        #[arg(long, short, value_name = "PATH")]
        file: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            switchyard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.router.log_level);
    for variable in &config.unset_variables {
        tracing::warn!(variable = %variable, "placeholder variable is not set, using empty value");
    }

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Check) => check::run_check(&config),
        Some(Commands::Route { file }) => route::run_route(&config, &file).await,
        None => {
            println!("switchyard: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        report(&err);
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<SwitchyardConfig, Vec<switchyard_config::ConfigError>> {
    match path {
        Some(path) => switchyard_config::load_and_validate_path(path),
        None => switchyard_config::load_and_validate(),
    }
}

/// Routing failures are printed as their structured failure object.
fn report(err: &CliError) {
    match err {
        CliError::Router(e) => {
            let failure = serde_json::json!({ "error": e.to_failure() });
            eprintln!("{failure}");
        }
        other => eprintln!("switchyard: {other}"),
    }
}
