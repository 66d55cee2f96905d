//! Gradebook configuration.
//!
//! Search order:
//! 1. an explicit path (must exist)
//! 2. `gradebook.toml` in the current directory
//! 3. `~/.config/gradebook/config.toml`
//!
//! `GRADEBOOK_DATA_FILE` overrides `data_file` from any of them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::CsvGradeStore;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = "gradebook.toml";

/// Environment variable that overrides the data file location.
pub const DATA_FILE_ENV: &str = "GRADEBOOK_DATA_FILE";

/// Top-level gradebook configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradebookConfig {
    /// CSV file holding the grade records. Relative paths are resolved
    /// against the directory of the config file they came from.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data").join("students.csv")
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

impl GradebookConfig {
    /// Open the file-backed store this config points at.
    pub fn open_store(&self) -> CsvGradeStore {
        CsvGradeStore::new(&self.data_file)
    }

    /// Render as TOML, suitable for writing to [`LOCAL_CONFIG_FILE`].
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradebookConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => [Some(PathBuf::from(LOCAL_CONFIG_FILE)), global_config_path()]
            .into_iter()
            .flatten()
            .find(|p| p.exists()),
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            if config.data_file.is_relative() {
                if let Some(dir) = path.parent() {
                    config.data_file = dir.join(&config.data_file);
                }
            }
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => GradebookConfig::default(),
    };

    apply_data_file_override(&mut config, std::env::var(DATA_FILE_ENV).ok());
    Ok(config)
}

/// Replace `data_file` with the value of [`DATA_FILE_ENV`], unless it is blank.
fn apply_data_file_override(config: &mut GradebookConfig, value: Option<String>) {
    if let Some(file) = value.filter(|f| !f.trim().is_empty()) {
        config.data_file = PathBuf::from(expand_env_vars(&file));
    }
}

/// Parse a TOML config string, expanding `${VAR}` references in paths.
pub fn parse_config(content: &str) -> Result<GradebookConfig> {
    let mut config: GradebookConfig = toml::from_str(content)?;
    let raw = config.data_file.to_string_lossy().into_owned();
    config.data_file = PathBuf::from(expand_env_vars(&raw));
    Ok(config)
}

/// Replace `${NAME}` with the value of environment variable `NAME` (empty if
/// unset). An unterminated `${` is left as is.
fn expand_env_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        out.push_str(&std::env::var(name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}

fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("gradebook")
            .join("config.toml")
    })
}
