use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages (what --verbose selects)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl LogLevel {
    /// Directive fragment understood by tracing's EnvFilter
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "convoy - Move or copy notes together with everything they link to")]
#[command(version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault root directory (overrides config file and CONVOY_VAULT)
    #[arg(long, global = true, value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose diagnostics (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/convoy/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Set output format (text, json)
    #[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Move or copy a note and its linked notes into a directory
    Migrate(MigrateArgs),

    /// Show the notes a migration would bring along, without migrating
    Links(LinksArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct MigrateArgs {
    /// Name or path of the note to migrate
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// Directory the notes end up in (created if missing)
    #[arg(value_name = "TARGET_DIR")]
    pub target: PathBuf,

    /// Migrate only the named note, without its references
    #[arg(long)]
    pub no_references: bool,

    /// Include direct references only, not references of references
    #[arg(long)]
    pub no_recursive: bool,

    /// Copy notes instead of moving them
    #[arg(long, conflicts_with = "force_move")]
    pub copy: bool,

    /// Move notes even when the config file defaults to copying
    #[arg(long = "move")]
    pub force_move: bool,

    /// Maximum reference depth to follow (default: 10)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<u32>,

    /// Show the migration plan without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct LinksArgs {
    /// Name or path of the note to inspect
    #[arg(value_name = "NOTE")]
    pub note: String,

    /// List direct references only
    #[arg(long)]
    pub no_recursive: bool,

    /// Maximum reference depth to follow (default: 10)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<u32>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a commented example config file
    Init {
        /// Where to write the file (defaults to the standard config path)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
    /// Print the default config file path
    Path,
}
