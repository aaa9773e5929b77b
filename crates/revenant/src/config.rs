//! # Runtime Configuration
//!
//! Loaded once at startup from TOML. Every section and key is optional:
//!
//! ```toml
//! [pools]
//! log_status = true
//! init_size = 8
//!
//! [auto_return]
//! delay_secs = 2.5
//!
//! [dispatcher]
//! sweep_interval_frames = 600
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use revenant_core::{AutoReturnConfig, PoolManagerConfig};
use revenant_shared::DEFAULT_SWEEP_INTERVAL_FRAMES;

use crate::error::{RuntimeError, RuntimeResult};

/// `[dispatcher]` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Frames between stale-listener sweeps. `0` disables the sweep.
    pub sweep_interval_frames: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            sweep_interval_frames: DEFAULT_SWEEP_INTERVAL_FRAMES,
        }
    }
}

/// Complete runtime configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Pool manager settings.
    pub pools: PoolManagerConfig,
    /// Auto-return settings.
    pub auto_return: AutoReturnConfig,
    /// Dispatcher settings.
    pub dispatcher: DispatcherConfig,
}

impl RuntimeConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidConfig`] on syntax errors, unknown sections or
    /// values that fail [`validate`](Self::validate).
    pub fn from_toml_str(source: &str) -> RuntimeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| RuntimeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::ConfigIo`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| RuntimeError::ConfigIo {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "runtime config loaded");
        Ok(config)
    }

    /// Checks values serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::InvalidConfig`] if the auto-return delay is negative
    /// or not finite.
    pub fn validate(&self) -> RuntimeResult<()> {
        let delay = self.auto_return.delay_secs;
        if !delay.is_finite() || delay < 0.0 {
            return Err(RuntimeError::InvalidConfig(format!(
                "auto_return.delay_secs must be a finite, non-negative number of seconds, got {delay}"
            )));
        }
        Ok(())
    }
}
