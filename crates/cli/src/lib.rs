pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use atelier_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "atelier",
    about = "Atelier quote wizard",
    long_about = "Walk a client through service selection and the five-step questionnaire, then \
                  view, export, or send the finished quote.",
    after_help = "Examples:\n  atelier services\n  atelier select web-standard\n  atelier set \
                  business_name \"Acme Ltd\"\n  atelier next\n  atelier export --dir ./quotes"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to an atelier.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContactChannel {
    Whatsapp,
    Email,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List services, their packages, and the add-ons on offer")]
    Services,
    #[command(about = "Choose a package; its service becomes the selected service")]
    Select { package: String },
    #[command(about = "Set a questionnaire field; omit the value to clear it")]
    Set { field: String, value: Option<String> },
    #[command(about = "Toggle an add-on on or off")]
    Addon { id: String },
    #[command(about = "Validate the current step and move forward")]
    Next,
    #[command(about = "Move back one step")]
    Back,
    #[command(about = "Jump back to an earlier step")]
    Goto { step: u8 },
    #[command(about = "Show the current step, selection, running total, and open field errors")]
    Status,
    #[command(about = "Validate the whole questionnaire and generate the quote")]
    Submit,
    #[command(about = "Show the generated quote")]
    Quote,
    #[command(about = "Write the quote document (PDF when available, HTML otherwise)")]
    Export {
        #[arg(long, help = "Directory to write the document into")]
        dir: Option<PathBuf>,
    },
    #[command(about = "Build a contact link carrying the quote summary")]
    Contact {
        #[arg(value_enum)]
        channel: ContactChannel,
    },
    #[command(about = "Discard the session and start over")]
    Reset,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, session storage, and export readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    // Commands report config errors themselves; logging just stays off.
    if let Ok(config) = AppConfig::load(options.clone()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("logging disabled: {error:#}");
        }
    }

    let result = match cli.command {
        Command::Services => commands::services::run(options),
        Command::Select { package } => commands::wizard::select(options, &package),
        Command::Set { field, value } => {
            commands::wizard::set(options, &field, value.as_deref().unwrap_or_default())
        }
        Command::Addon { id } => commands::wizard::addon(options, &id),
        Command::Next => commands::wizard::next(options),
        Command::Back => commands::wizard::back(options),
        Command::Goto { step } => commands::wizard::goto(options, step),
        Command::Status => commands::wizard::status(options),
        Command::Submit => commands::wizard::submit(options),
        Command::Quote => commands::quote::run(options),
        Command::Export { dir } => commands::export::run(options, dir),
        Command::Contact { channel } => commands::contact::run(options, channel),
        Command::Reset => commands::wizard::reset(options),
        Command::Config => commands::config::run(options),
        Command::Doctor { json } => commands::doctor::run(options, json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays a single JSON document per command.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|error| anyhow::anyhow!(error))
    .context("failed to install tracing subscriber")
}
