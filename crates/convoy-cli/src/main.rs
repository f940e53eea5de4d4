use anyhow::Result;
use clap::Parser;

use convoy_cli::{
    cli::{Cli, Commands, LogLevel},
    commands, config,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; diagnostics go to stderr so stdout stays parseable
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        cli.log_level.unwrap_or(LogLevel::Warn)
    };
    let env_filter = format!(
        "convoy_core={level},convoy_cli={level}",
        level = log_level.as_filter_str()
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration with CLI overrides
    let config = config::CliConfig::load(cli.config, cli.vault)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(config, cli.format, args),
        Commands::Links(args) => commands::links::execute(config, cli.format, args),
        Commands::Config(command) => commands::config::execute(config, cli.format, command),
    }
}
