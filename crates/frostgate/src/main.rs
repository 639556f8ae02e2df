// SPDX-FileCopyrightText: 2026 Frostgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frostgate - HTTP gateway for Snowflake Cortex agents.
//!
//! This is the binary entry point for the frostgate server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod doctor;
mod serve;

/// Frostgate - HTTP gateway for Snowflake Cortex agents.
#[derive(Parser, Debug)]
#[command(name = "frostgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the frostgate gateway server.
    Serve,
    /// Check configuration and Snowflake connectivity.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match frostgate_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            frostgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("frostgate: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Print the effective configuration, with secrets redacted.
fn print_config(
    config: &frostgate_config::FrostgateConfig,
) -> Result<(), frostgate_core::FrostgateError> {
    let mut redacted = config.clone();
    if redacted.snowflake.password.is_some() {
        redacted.snowflake.password = Some("<redacted>".to_string());
    }
    let rendered = toml::to_string_pretty(&redacted)
        .map_err(|e| frostgate_core::FrostgateError::Internal(format!("render failed: {e}")))?;
    print!("{rendered}");
    Ok(())
}
