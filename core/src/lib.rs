#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Frequon simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative universe, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the universe executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems to react to deterministically. Systems consume event streams and
//! respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible universe mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reinitialises the population for a field of the provided pixel extents.
    Reset {
        /// Width of the field in pixels.
        width: u32,
        /// Height of the field in pixels.
        height: u32,
    },
    /// Advances the simulation by one frame.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
        /// Tracked player position for this frame, written into the reference slot.
        reference: PixelPoint,
    },
    /// Sets the maximum number of simultaneously live aliens.
    ConfigurePopulationCap {
        /// Alien cap, excluding the reference entity.
        max_live: usize,
    },
    /// Sets the expected number of admissions per second.
    ConfigureBirthRate {
        /// Admissions per second, only an average.
        per_second: f32,
    },
    /// Sets the speed assigned to newly born aliens.
    ConfigureVelocityMax {
        /// Spawn speed in pixels per second.
        pixels_per_second: f32,
    },
}

/// Events broadcast by the universe after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the field was reinitialised.
    FieldReset {
        /// Width of the field in pixels.
        width: u32,
        /// Height of the field in pixels.
        height: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that an alien was caught and entered its death sequence.
    CritterCaught {
        /// Identifier of the alien that started dying.
        id: CritterId,
    },
    /// Reports that a terminal alien was removed from the live population.
    CritterCulled {
        /// Identifier of the alien that was removed.
        id: CritterId,
    },
    /// Confirms that a new alien was admitted.
    CritterBorn {
        /// Identifier carried by the new alien.
        id: CritterId,
        /// Spawn position in pixels.
        position: PixelPoint,
    },
    /// Announces that the population cap changed.
    PopulationCapChanged {
        /// Alien cap that became active.
        max_live: usize,
    },
}

/// Stable identity tag carried by a critter across slot moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CritterId(u8);

impl CritterId {
    /// Creates a new critter identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Location in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    x: f32,
    y: f32,
}

impl PixelPoint {
    /// Creates a new pixel-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in pixels.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in pixels.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: PixelPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Tunable parameters of the birth process.
///
/// These are the hooks an external transition controller uses to ramp
/// difficulty in or out between frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Expected admissions per second.
    pub birth_rate: f32,
    /// Maximum number of simultaneously live aliens.
    pub max_live: usize,
    /// Speed assigned to newly born aliens, in pixels per second.
    pub velocity_max: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self::new(1.0, 1, 1.0)
    }
}

impl PopulationConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(birth_rate: f32, max_live: usize, velocity_max: f32) -> Self {
        Self {
            birth_rate,
            max_live,
            velocity_max,
        }
    }

    /// Checks the configuration against an arena holding `capacity` slots.
    ///
    /// One slot is always reserved for the reference entity, so at most
    /// `capacity - 1` aliens can be live.
    pub fn validate(&self, capacity: usize) -> Result<(), ConfigError> {
        let usable = capacity.saturating_sub(1);
        if self.max_live > usable {
            return Err(ConfigError::CapExceedsCapacity {
                max_live: self.max_live,
                usable,
            });
        }
        if self.birth_rate.is_nan() || self.birth_rate < 0.0 {
            return Err(ConfigError::InvalidBirthRate {
                rate: self.birth_rate,
            });
        }
        if !self.velocity_max.is_finite() {
            return Err(ConfigError::NonFiniteVelocity {
                velocity: self.velocity_max,
            });
        }
        Ok(())
    }
}

/// Reasons a population configuration may be rejected before it is applied.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The cap leaves no room for the reference entity.
    #[error("population cap {max_live} exceeds the {usable} usable alien slots")]
    CapExceedsCapacity {
        /// Requested alien cap.
        max_live: usize,
        /// Slots available to aliens.
        usable: usize,
    },
    /// The birth rate is negative or not a number.
    #[error("birth rate {rate} must be a non-negative number")]
    InvalidBirthRate {
        /// Rejected rate.
        rate: f32,
    },
    /// The spawn speed is infinite or not a number.
    #[error("spawn velocity {velocity} must be finite")]
    NonFiniteVelocity {
        /// Rejected velocity.
        velocity: f32,
    },
}
