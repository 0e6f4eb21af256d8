use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use protogen_core::ProtogenConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file populated with the defaults
    Init(InitArgs),
    /// Print the effective config as TOML
    Show,
    /// Validate the config file
    Validate,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Validate => run_validate(),
        ConfigCommands::Path => run_path(),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = ProtogenConfig::config_path();

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        );
    }

    ProtogenConfig::default()
        .save()
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Adjust option lists and timings");
    println!("  3. Run: protogen config validate");

    Ok(())
}

fn run_show() -> Result<()> {
    let config = ProtogenConfig::load().context("Failed to load config")?;
    let toml_str =
        toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);
    Ok(())
}

fn run_validate() -> Result<()> {
    let config_path = ProtogenConfig::config_path();
    println!("🔍 Validating configuration...");

    if !config_path.exists() {
        println!("   ⚠ No config at {:?}; defaults are in effect", config_path);
        println!("\n✅ Configuration valid!");
        return Ok(());
    }

    let config = ProtogenConfig::load_from(&config_path)
        .with_context(|| format!("Invalid config at {:?}", config_path))?;

    println!("   ✓ Config loaded successfully");
    println!(
        "   ✓ {} disease areas, {} study types",
        config.options.disease_areas.len(),
        config.options.study_types.len()
    );
    println!(
        "   ✓ Card delay {}..{}ms, submit delay {}ms",
        config.timings.card_delay_min_ms,
        config.timings.card_delay_max_ms,
        config.timings.submit_delay_ms
    );
    println!("\n✅ Configuration valid!");

    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", ProtogenConfig::config_path().display());
    Ok(())
}
