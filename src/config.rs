//! Configuration for stockroom.
//!
//! Config files are Markdown with YAML frontmatter:
//!
//! ```markdown
//! ---
//! store:
//!   path: data/products.json
//!   skip_invalid: false
//! history:
//!   size: 15
//! scripts:
//!   max_depth: 10
//! output:
//!   format: human
//! ---
//!
//! # Notes about this collection
//! ```
//!
//! The global file (`<config dir>/stockroom/config.md`) is merged with the
//! project file (`.stockroom/config.md`); project values win. Both files are
//! optional. `STOCKROOM_FILE` overrides the store path.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_CONFIG: &str = ".stockroom/config.md";
pub const STORE_ENV: &str = "STOCKROOM_FILE";

fn default_store_path() -> PathBuf {
    PathBuf::from("products.json")
}

fn default_history_size() -> usize {
    15
}

fn default_max_depth() -> usize {
    10
}

/// How user-facing output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Quiet => write!(f, "quiet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store: StoreConfig,
    pub history: HistoryConfig,
    pub scripts: ScriptConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub path: PathBuf,
    /// Drop records that fail validation on load instead of refusing to start.
    pub skip_invalid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptConfig {
    /// Deepest allowed nesting of `execute_script`.
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        PartialConfig::default().merge_with(PartialConfig::default())
    }
}

impl Config {
    /// Load global and project config, then apply the environment override.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_merged_from(
            global_config_path().as_deref(),
            Path::new(PROJECT_CONFIG),
        )?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config = PartialConfig::parse(content)?.merge_with(PartialConfig::default());
        config.validate()?;
        Ok(config)
    }

    /// Merge two config files, either of which may be missing.
    pub fn load_merged_from(global_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let global = global_path
            .filter(|p| p.exists())
            .map(PartialConfig::load_from)
            .transpose()?
            .unwrap_or_default();

        let project = if project_path.exists() {
            PartialConfig::load_from(project_path)?
        } else {
            PartialConfig::default()
        };

        let config = global.merge_with(project);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(STORE_ENV) {
            if !path.trim().is_empty() {
                self.store.path = PathBuf::from(path);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.history.size == 0 {
            anyhow::bail!("history.size must be greater than 0");
        }
        if self.scripts.max_depth == 0 {
            anyhow::bail!("scripts.max_depth must be greater than 0");
        }
        Ok(())
    }
}

/// Returns the path to the global config file, e.g. ~/.config/stockroom/config.md
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stockroom").join("config.md"))
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    store: Option<PartialStoreConfig>,
    history: Option<PartialHistoryConfig>,
    scripts: Option<PartialScriptConfig>,
    output: Option<PartialOutputConfig>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialStoreConfig {
    path: Option<PathBuf>,
    skip_invalid: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialHistoryConfig {
    size: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialScriptConfig {
    max_depth: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    format: Option<OutputFormat>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let frontmatter =
            extract_frontmatter(content).context("Failed to extract frontmatter from config")?;

        if frontmatter.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")
    }

    /// Merge this global config with a project config, returning the merged result.
    /// Values from the project config take precedence over global.
    fn merge_with(self, project: PartialConfig) -> Config {
        let global_store = self.store.unwrap_or_default();
        let global_history = self.history.unwrap_or_default();
        let global_scripts = self.scripts.unwrap_or_default();
        let global_output = self.output.unwrap_or_default();
        let project_store = project.store.unwrap_or_default();
        let project_history = project.history.unwrap_or_default();
        let project_scripts = project.scripts.unwrap_or_default();
        let project_output = project.output.unwrap_or_default();

        Config {
            store: StoreConfig {
                path: project_store
                    .path
                    .or(global_store.path)
                    .unwrap_or_else(default_store_path),
                skip_invalid: project_store
                    .skip_invalid
                    .or(global_store.skip_invalid)
                    .unwrap_or(false),
            },
            history: HistoryConfig {
                size: project_history
                    .size
                    .or(global_history.size)
                    .unwrap_or_else(default_history_size),
            },
            scripts: ScriptConfig {
                max_depth: project_scripts
                    .max_depth
                    .or(global_scripts.max_depth)
                    .unwrap_or_else(default_max_depth),
            },
            output: OutputConfig {
                format: project_output
                    .format
                    .or(global_output.format)
                    .unwrap_or_default(),
            },
        }
    }
}

fn extract_frontmatter(content: &str) -> Option<String> {
    let content = content.trim();

    if !content.starts_with("---") {
        return None;
    }

    let rest = &content[3..];
    rest.find("---").map(|end| rest[..end].to_string())
}
