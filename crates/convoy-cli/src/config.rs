use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Vault configuration
    #[serde(default)]
    pub vault: VaultConfig,
    /// Migration defaults
    #[serde(default)]
    pub migrate: MigrateConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Vault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Path to the vault directory (tilde expanded)
    pub path: Option<PathBuf>,
}

/// Migration defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Depth bound for reference traversal
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Copy instead of move by default
    #[serde(default)]
    pub copy: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Colored terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            copy: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

fn default_max_depth() -> u32 {
    convoy_core::DEFAULT_MAX_DEPTH
}

fn default_color() -> bool {
    true
}

impl CliConfig {
    /// Load configuration with precedence: defaults < file < env < args
    pub fn load(config_file: Option<PathBuf>, vault: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::from_file_or_default(config_file)?;

        // Override with env vars
        if let Ok(path) = std::env::var("CONVOY_VAULT") {
            config.vault.path = Some(PathBuf::from(path));
        }

        // Override with CLI args (highest priority)
        if let Some(path) = vault {
            config.vault.path = Some(path);
        }

        Ok(config)
    }

    /// Resolved vault root, with the tilde expanded.
    ///
    /// Errors when nothing configured it; the vault is required for every
    /// command that touches notes.
    pub fn vault_path(&self) -> Result<PathBuf> {
        let path = self.vault.path.as_ref().context(
            "no vault configured: pass --vault, set CONVOY_VAULT, or set [vault] path in the config file",
        )?;
        Ok(expand_tilde(path))
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("convoy");
        Ok(config_dir.join("config.toml"))
    }

    /// Create a new config file with example values
    pub fn create_example(path: &Path) -> Result<()> {
        let example = r#"# Convoy CLI Configuration
# Location: ~/.config/convoy/config.toml

[vault]
# Path to your vault (the root folder holding all notes)
# There is no default; --vault and CONVOY_VAULT override this.
# path = "~/notes"

[migrate]
# How many levels of references to follow
max_depth = 10

# Copy notes instead of moving them (--move overrides this per run)
copy = false

[output]
# Colored terminal output
color = true
"#;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        std::fs::write(path, example).context("Failed to write config file")?;

        Ok(())
    }

    /// Load config from file or return default
    fn from_file_or_default(config_file: Option<PathBuf>) -> Result<Self> {
        let path = match config_file {
            // An explicitly named file must exist and parse.
            Some(path) => Some(path),
            // Test mode keeps the user-level config out of the picture
            None if std::env::var("CONVOY_TEST_MODE").is_ok() => None,
            None => Self::default_config_path()
                .ok()
                .filter(|path| path.exists()),
        };

        if let Some(path) = path {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Display the current configuration as TOML
    pub fn display_as_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config as TOML")
    }

    /// Display the current configuration as JSON
    pub fn display_as_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config as JSON")
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
