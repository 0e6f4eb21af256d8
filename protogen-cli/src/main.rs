//! protogen CLI - Study protocol generator
//!
//! Entry point for the `protogen` command-line tool:
//! - Interactive terminal front-end (`tui` subcommand)
//! - Headless setup → workspace → report run (`generate` subcommand)
//! - Configuration management (`config` subcommand)
//! - Shell completions

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use protogen_core::{MockGenerator, ProtocolGenerator, ProtogenConfig, Session};
use tracing::info;

mod commands;
mod config;
mod tracing_setup;
mod tui;
mod ui;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "protogen",
    author,
    version,
    about = "Generate study protocol drafts from a short study description",
    long_about = "Fill in a study title, objective, disease area and study type, review the \
                  most similar past protocols, reveal the generated sections and export a \
                  plain-text protocol report."
)]
struct Cli {
    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "PROTOGEN_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive terminal interface (setup form and protocol workspace)
    Tui,
    /// Run the setup form headlessly and export the protocol report
    Generate(commands::generate::GenerateArgs),
    /// Manage protogen configuration (init, show, validate, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let tracing_config = TracingConfig { debug: cli.debug };

    // Initialize UI quiet mode from flag, env var, and TTY detection
    ui::init_quiet_mode(cli.quiet);

    match cli.command {
        Commands::Tui => {
            let log_path = ProtogenConfig::home_dir().join("protogen.log");
            tracing_setup::init_file(&tracing_config, &log_path).ok();
            run_tui()?
        }
        Commands::Generate(args) => {
            tracing_setup::init(&tracing_config).ok();
            commands::run_generate(args).await?
        }
        Commands::Config(args) => {
            tracing_setup::init(&tracing_config).ok();
            config::run_config(args)?
        }
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_tui() -> Result<()> {
    let config = ProtogenConfig::load().context("Failed to load config")?;
    info!(theme = ?config.ui.theme, "starting tui");

    let generator: Arc<dyn ProtocolGenerator> = Arc::new(MockGenerator::new());
    let session = Session::new(config, generator);

    // The draw loop blocks; timers still need the runtime's workers
    tokio::task::block_in_place(|| tui::run(session))
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
