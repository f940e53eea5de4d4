//! Config command: inspect and bootstrap the configuration file.

use anyhow::{bail, Result};
use colored::Colorize;

use crate::cli::{ConfigCommands, OutputFormat};
use crate::config::CliConfig;

pub fn execute(config: CliConfig, format: OutputFormat, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let rendered = match format {
                OutputFormat::Text => config.display_as_toml()?,
                OutputFormat::Json => config.display_as_json()?,
            };
            println!("{rendered}");
        }
        ConfigCommands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => CliConfig::default_config_path()?,
            };
            if path.exists() {
                bail!("config file already exists: {}", path.display());
            }
            CliConfig::create_example(&path)?;
            println!(
                "{} wrote example config to {}",
                "Success:".green().bold(),
                path.display()
            );
        }
        ConfigCommands::Path => {
            println!("{}", CliConfig::default_config_path()?.display());
        }
    }
    Ok(())
}
