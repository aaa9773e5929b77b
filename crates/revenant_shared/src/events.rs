//! Event identifiers routed by the dispatcher.
//!
//! The set is closed: new kinds are added here at build time, never
//! registered at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of game events a listener can subscribe to.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventId {
    /// The player ship fired.
    SpaceshipShoot = 0,
    /// A bullet hit something.
    BulletHit = 1,
    /// An enemy died.
    EnemyDie = 2,
    /// The audio analyser crossed its dB threshold.
    AudioDbValueHit = 3,
    /// The audio analyser reading changed.
    AudioDbValueChange = 4,
    /// A triangle enemy was hit.
    TriangleEnemyHit = 5,
    /// The earth took a hit.
    EarthHit = 6,
    /// The score multiplier changed.
    MultiplierChange = 7,
    /// The run is over.
    GameOver = 8,
}

impl EventId {
    /// Every identifier, in discriminant order.
    pub const ALL: [Self; 9] = [
        Self::SpaceshipShoot,
        Self::BulletHit,
        Self::EnemyDie,
        Self::AudioDbValueHit,
        Self::AudioDbValueChange,
        Self::TriangleEnemyHit,
        Self::EarthHit,
        Self::MultiplierChange,
        Self::GameOver,
    ];

    /// Stable name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpaceshipShoot => "SpaceshipShoot",
            Self::BulletHit => "BulletHit",
            Self::EnemyDie => "EnemyDie",
            Self::AudioDbValueHit => "AudioDbValueHit",
            Self::AudioDbValueChange => "AudioDbValueChange",
            Self::TriangleEnemyHit => "TriangleEnemyHit",
            Self::EarthHit => "EarthHit",
            Self::MultiplierChange => "MultiplierChange",
            Self::GameOver => "GameOver",
        }
    }

    /// Converts a raw discriminant back into an identifier.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::ALL.len() {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
