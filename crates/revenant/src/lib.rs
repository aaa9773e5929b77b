//! # Revenant
//!
//! The runtime crate, wiring the pooling core to event dispatch.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            REVENANT RUNTIME                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐   │
//! │  │  revenant_core  │     │    services     │     │     events      │   │
//! │  │                 │<────│                 │────>│                 │   │
//! │  │  • Pool         │     │  • install      │     │  • register     │   │
//! │  │  • PoolManager  │     │  • require      │     │  • post         │   │
//! │  │  • AutoReturn   │     │  • teardown     │     │  • sweep        │   │
//! │  └────────┬────────┘     └─────────────────┘     └────────┬────────┘   │
//! │           │                                               │            │
//! │           │              ┌─────────────────┐              │            │
//! │           └─────────────>│   game_loop     │<─────────────┘            │
//! │                          │                 │                           │
//! │                          │  • auto-return  │                           │
//! │                          │  • pool status  │                           │
//! │                          │  • stale sweep  │                           │
//! │                          └─────────────────┘                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML runtime configuration
//! - `events`: Listener registry and synchronous dispatch
//! - `game_loop`: Per-frame housekeeping
//! - `services`: Explicit process-wide accessors
//! - `signal`: Parameterless multicast hooks

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod services;
pub mod signal;

// Re-export the lower crates
pub use revenant_core as core;
pub use revenant_shared as shared;

// Re-export commonly used types
pub use config::{DispatcherConfig, RuntimeConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use events::{DispatchReport, EventDispatcher, ListenerId};
pub use game_loop::{FrameStats, GameLoop, SharedPools};
pub use revenant_shared::EventId;
pub use signal::{Signal, SignalHandle};
