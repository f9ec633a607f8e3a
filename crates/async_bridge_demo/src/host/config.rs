use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_bridge_engine::RuntimeSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogDestination {
    /// Write to ./bridge.log in current directory.
    File,
    /// Write to terminal (stderr for warnings and errors).
    #[default]
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per rendered frame.
    Json,
}

/// Demo settings, read from an optional RON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub reject_delay_ms: u64,
    pub slow_delay_ms: u64,
    /// Time between the two clicks on the slow button.
    pub double_click_gap_ms: u64,
    /// Extra wait after an operation is expected to settle.
    pub settle_margin_ms: u64,
    pub worker_threads: usize,
    pub log_destination: LogDestination,
    pub output: OutputFormat,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            reject_delay_ms: 50,
            slow_delay_ms: 200,
            double_click_gap_ms: 100,
            settle_margin_ms: 50,
            worker_threads: 2,
            log_destination: LogDestination::Terminal,
            output: OutputFormat::Text,
        }
    }
}

impl DemoConfig {
    pub fn reject_delay(&self) -> Duration {
        Duration::from_millis(self.reject_delay_ms)
    }

    pub fn slow_delay(&self) -> Duration {
        Duration::from_millis(self.slow_delay_ms)
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            worker_threads: self.worker_threads,
            ..RuntimeSettings::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("double click gap ({gap} ms) must be shorter than the slow delay ({slow} ms)")]
    GapTooLong { gap: u64, slow: u64 },
}

/// Loads the config at `path`, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<DemoConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: DemoConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &DemoConfig) -> Result<(), ConfigError> {
    // The second slow click must land while the first operation is still pending.
    if config.double_click_gap_ms >= config.slow_delay_ms {
        return Err(ConfigError::GapTooLong {
            gap: config.double_click_gap_ms,
            slow: config.slow_delay_ms,
        });
    }
    Ok(())
}
