//! Persistent configuration: the NewsAPI key and retrieval tunables.
//!
//! Stored as YAML. A missing file is not an error and yields defaults; a
//! file that exists but cannot be read or parsed is.
//!
//! ```yaml
//! api_key: 0123456789abcdef
//! retrieval:
//!   max_candidates: 5
//!   accept_invalid_certs: true
//! ```

use crate::retrieval::RetrievalConfig;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("a NewsAPI key is required (get one at https://newsapi.org/register)")]
    MissingApiKey,

    #[error("could not read the API key from the terminal: {0}")]
    Prompt(#[source] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    /// Load from `path`, or defaults if it does not exist.
    #[instrument(level = "debug")]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`load`](Self::load), but an unreadable or invalid file yields
    /// defaults, so `config set-key` can overwrite it.
    pub async fn load_or_default(path: &Path) -> Self {
        match Self::load(path).await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Ignoring unusable config file");
                Self::default()
            }
        }
    }

    fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        fs::write(path, yaml).await.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Store `api_key` and persist.
    pub async fn set_api_key(&mut self, api_key: &str, path: &Path) -> Result<(), ConfigError> {
        self.api_key = Some(api_key.trim().to_string());
        self.save(path).await
    }

    /// Forget the stored key. Deletes the file when nothing else is customised.
    pub async fn clear_api_key(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.api_key = None;
        if self.retrieval == RetrievalConfig::default() {
            match fs::remove_file(path).await {
                Ok(()) => {
                    info!(path = %path.display(), "Removed config file");
                    Ok(())
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }),
            }
        } else {
            self.save(path).await
        }
    }
}

/// Resolve the API key: explicit value first, then the config file, then an
/// interactive prompt whose answer is saved for next time.
pub async fn resolve_api_key(
    explicit: Option<&str>,
    config: &mut AppConfig,
    path: &Path,
) -> Result<String, ConfigError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }

    let key = tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        prompt_for_api_key(&mut stdin.lock(), &mut std::io::stderr())
    })
    .await
    .map_err(|e| ConfigError::Prompt(std::io::Error::other(e)))??;
    config.set_api_key(&key, path).await?;
    Ok(key)
}

/// Ask for a key on `output` and read one line from `input`.
pub fn prompt_for_api_key<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<String, ConfigError> {
    write_banner(output).map_err(ConfigError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(ConfigError::Prompt)?;
    let key = line.trim();
    if key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(key.to_string())
}

fn write_banner<W: Write>(output: &mut W) -> std::io::Result<()> {
    let rule = "=".repeat(60);
    writeln!(output, "\n{rule}\n  WELCOME TO NEWS TERMINAL\n{rule}")?;
    writeln!(output, "\nTo use this application, you need a NewsAPI key.")?;
    writeln!(output, "Get your FREE API key at: https://newsapi.org/register\n")?;
    write!(output, "Enter your NewsAPI key: ")?;
    output.flush()
}
