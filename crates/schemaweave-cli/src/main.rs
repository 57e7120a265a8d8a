//! Schemaweave CLI - Command-line interface for the schema composition codec
//!
//! This is the main entry point for the Schemaweave CLI application, providing
//! commands for decoding documents against shapes, re-encoding them and
//! checking shape declarations.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;
mod summary;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration feeds logging, so it is loaded first
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, cli.use_color()));
            process::exit(e.exit_code());
        }
    };

    control::set_override(cli.use_color() && config.output.color);

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, config) {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let timer = Timer::new("cli_execution");

    let format = match cli.output {
        Some(format) => format,
        None => config.output_format()?,
    };
    let use_color = control::SHOULD_COLORIZE.should_colorize();
    let mut output = OutputWriter::new(format, use_color, cli.quiet, cli.verbosity_level());

    tracing::info!(
        verbosity = cli.verbosity_level(),
        format = ?format,
        "Executing command"
    );

    let result = match cli.command {
        Commands::Decode(args) => handlers::handle_decode(args, &config, &mut output),
        Commands::Encode(args) => handlers::handle_encode(args, &config, &mut output),
        Commands::Check(args) => handlers::handle_check(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    };

    tracing::debug!(
        elapsed_ms = timer.elapsed().as_millis() as u64,
        success = result.is_ok(),
        "Command finished"
    );
    result
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    logging::init_logging(logging_config(cli, config))
}

/// Logging settings from verbosity, the config file and the environment
fn logging_config(cli: &Cli, config: &Config) -> LoggingConfig {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    logging_config.merge_with_file(&config.logging, verbosity);
    logging_config.merge_with_env();

    // Quiet mode still logs errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging_config
}
