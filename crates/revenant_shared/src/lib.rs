//! # Revenant Shared
//!
//! Plain types used by both the pooling core and the event runtime:
//! spatial math, the closed [`EventId`] set, tuning constants and the
//! [`diag`] logging facade.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod diag;
pub mod events;
pub mod math;

pub use constants::{
    DEFAULT_AUTO_RETURN_SECS, DEFAULT_INIT_SIZE, DEFAULT_LAZY_WARM_SIZE,
    DEFAULT_SWEEP_INTERVAL_FRAMES, PARKING_POSITION,
};
pub use events::EventId;
pub use math::{Quaternion, Vec3};
