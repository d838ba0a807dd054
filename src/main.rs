mod api;
mod cli;
mod config;
mod error;
mod models;

use clap::Parser;
use cli::{App, Cli, Commands, OutputOptions};
use colored::*;
use config::Config;
use dialoguer::{theme::ColorfulTheme, Select};
use error::{AppError, Result};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sets up stderr logging plus, when `log_dir` is given, a daily rolling JSON log file.
///
/// The returned guard must stay alive for buffered file logs to be flushed.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "nasa-tools.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

/// The single user-facing line for a fatal error. Details go to the logs.
fn failure_line(prefix: &str, e: &AppError) -> String {
    format!("{} {}", prefix.red(), e.to_string().red())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config.with_api_key(cli.api_key.clone()),
        Err(e) => {
            eprintln!("{}", failure_line("Error: invalid configuration:", &e));
            std::process::exit(1);
        },
    };

    // Initialize logging
    let log_guard = init_logging(config.log_dir.as_deref());

    info!("Initializing NASA tools (API root: {})", config.base_url);
    if config.is_demo_key() {
        warn!("NASA_API_KEY not set, falling back to DEMO_KEY (heavily rate limited)");
    }

    let output = OutputOptions {
        json: cli.json,
        save: cli.save.clone(),
    };
    let app = match App::new(&config, output) {
        Ok(app) => {
            info!("Application initialized successfully.");
            app
        },
        Err(e) => {
            eprintln!("{}", failure_line("Error: failed to initialize application:", &e));
            drop(log_guard);
            std::process::exit(1);
        },
    };

    // One-shot mode
    if let Some(command) = cli.command {
        let outcome = app.run_command(command).await;
        // Flush file logs before exiting.
        drop(log_guard);
        if let Err(e) = outcome {
            eprintln!("{}", failure_line("Error:", &e));
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("{}", "Welcome to the NASA Open Data CLI!".cyan().bold());

    // Main interactive loop
    loop {
        let options = &[
            "Astronomy Picture of the Day",
            "Near-Earth Asteroids (by approach date)",
            "Look Up an Asteroid",
            "Mars Rover Photos",
            "EPIC Earth Imagery",
            "Exit",
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(options)
            .default(0)
            .interact_opt()? // Esc / q cancels
            .unwrap_or(options.len() - 1); // Default to Exit if cancelled

        println!("\n---\n");

        let command = match selection {
            0 => cli::prompt_apod().map(Commands::Apod),
            1 => cli::prompt_asteroid_feed().map(Commands::Asteroids),
            2 => cli::prompt_asteroid_lookup().map(Commands::Asteroid),
            3 => cli::prompt_rover().map(Commands::Rover),
            4 => cli::prompt_epic().map(Commands::Epic),
            _ => {
                println!("{}", "Exiting application. Goodbye!".green());
                break;
            },
        };

        let command = match command {
            Ok(command) => command,
            Err(e) => {
                println!("{} {}", "Failed to get input:".red(), e);
                continue;
            },
        };

        // Handle potential errors from command execution
        if let Err(e) = app.run_command(command).await {
            error!("Command execution failed: {:?}", e);
            println!(
                "{} {}",
                "Error executing command:".red(),
                e.to_string().red()
            );
        }

        println!("\n---\n");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_line_is_single_display_line() {
        colored::control::set_override(false);

        let e = AppError::Nasa {
            status: 403,
            message: "An invalid api_key was supplied.".to_string(),
        };
        let line = failure_line("Error:", &e);

        assert_eq!(line, format!("Error: {}", e));
        assert_eq!(line.matches("An invalid api_key was supplied.").count(), 1);
        assert!(!line.contains('\n'));
        // Debug formatting of the enum never leaks to the user.
        assert!(!line.contains("Nasa {"));
    }
}
