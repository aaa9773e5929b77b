//! Config sections owned by the pooling core.
//!
//! Both sections deserialize from partial TOML tables; missing keys fall
//! back to the constants in `revenant_shared`.

use serde::{Deserialize, Serialize};

use revenant_shared::{DEFAULT_AUTO_RETURN_SECS, DEFAULT_INIT_SIZE};

/// `[pools]` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolManagerConfig {
    /// Log per-pool usage whenever it changed during a frame.
    pub log_status: bool,
    /// Instances pre-created for each prefab passed to `with_prefabs`.
    pub init_size: usize,
}

impl Default for PoolManagerConfig {
    fn default() -> Self {
        Self {
            log_status: false,
            init_size: DEFAULT_INIT_SIZE,
        }
    }
}

/// `[auto_return]` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoReturnConfig {
    /// Seconds an armed instance stays out before it is released.
    pub delay_secs: f32,
}

impl Default for AutoReturnConfig {
    fn default() -> Self {
        Self {
            delay_secs: DEFAULT_AUTO_RETURN_SECS,
        }
    }
}
