//! Publishing configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::CodeFormat;

/// Environment variable that replaces `output_dir`.
pub const OUTPUT_DIR_ENV: &str = "QUIZFORGE_OUTPUT_DIR";

/// Quiz sources to publish, by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishSources {
    /// Quizzes rendered to static pages.
    #[serde(default)]
    pub html: Vec<PathBuf>,
    /// Quizzes served by an interactive app.
    #[serde(default)]
    pub app: Vec<PathBuf>,
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// Where published files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub publish: PublishSources,
    /// Completion code format for quizzes that do not set their own.
    #[serde(default)]
    pub completion: CodeFormat,
    /// Directory of the loaded config file. Relative paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./site")
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            publish: PublishSources::default(),
            completion: CodeFormat::default(),
            base_dir: PathBuf::new(),
        }
    }
}

impl QuizforgeConfig {
    /// Resolve a path from the config file.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// Environment variable override: `QUIZFORGE_OUTPUT_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            config.output_dir = config.resolve(&config.output_dir);
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizforgeConfig::default(),
    };

    apply_overrides(&mut config, std::env::var(OUTPUT_DIR_ENV).ok());
    Ok(config)
}

/// Parse and check a config file's contents.
pub fn parse_config_str(content: &str) -> Result<QuizforgeConfig> {
    let config: QuizforgeConfig = toml::from_str(content)?;
    config
        .completion
        .validate()
        .context("invalid [completion] section")?;
    Ok(config)
}

fn apply_overrides(config: &mut QuizforgeConfig, output_dir: Option<String>) {
    if let Some(dir) = output_dir.filter(|d| !d.is_empty()) {
        config.output_dir = PathBuf::from(dir);
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}
