// ABOUTME: Main entry point for the resize-image CLI application
// ABOUTME: Parses arguments, loads configuration, and dispatches to command handlers

use anyhow::Result;
use clap::{CommandFactory, Parser};
use resize_image_cli::cli::{Cli, Commands};
use resize_image_cli::commands::{run_batch, run_inspect, run_resize};
use resize_image_cli::completions::generate_completions;
use resize_image_cli::config::Config;
use resize_image_cli::output::OutputFormat;
use std::env;
use std::io;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.config {
        Some(ref path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    // Determine if color should be used
    let use_color = !cli.no_color
        && env::var("NO_COLOR").is_err()
        && env::var("TERM").unwrap_or_default() != "dumb";

    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match cli.command {
        Commands::Resize {
            url,
            size,
            strict,
            json,
        } => {
            let format = if json {
                OutputFormat::Json
            } else {
                config.output_format()
            };
            run_resize(&url, &size, strict, format, &config, &mut writer)?;
        }
        Commands::Batch { size, json_input } => {
            let stdin = io::stdin();
            run_batch(&size, json_input, &config, stdin.lock(), &mut writer)?;
        }
        Commands::Inspect { url, json } => {
            let format = if json {
                OutputFormat::Json
            } else {
                config.output_format()
            };
            run_inspect(&url, format, use_color, &config, &mut writer)?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell, &mut Cli::command(), &mut writer);
        }
    }

    Ok(())
}
