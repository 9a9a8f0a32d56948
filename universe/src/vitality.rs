//! Health state machine and the proximity damage model.

use frequon_core::PixelPoint;

use crate::Critter;

/// Health assigned to a newly born alien.
pub const INITIAL_HEALTH: i32 = 0x7FFF;

/// Health value marking an alien as eligible for removal.
pub const DEATH_THRESHOLD: i32 = -0x8000;

/// Seconds of point-blank capture required to kill an alien.
pub const KILL_TIME: f32 = 0.1;

/// Seconds for a full-amplitude alien to fade out once dying.
pub const AMPLITUDE_DIE_TIME: f32 = 2.0;

/// Last death-animation frame before the countdown itself runs into the threshold.
const FINAL_DYING_FRAME: u16 = 0x7FFF;

/// Lifecycle phase of a critter.
///
/// The signed health integer of the classic game is reproduced by
/// [`Vitality::health`]: alive critters report their remaining health,
/// dying critters report the negated animation frame, and terminal critters
/// report [`DEATH_THRESHOLD`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vitality {
    /// Healthy critter with strictly positive remaining health.
    Alive {
        /// Remaining health points.
        health: i32,
    },
    /// Critter playing its death animation.
    Dying {
        /// One-based animation frame, advanced once per update.
        frame: u16,
    },
    /// Critter awaiting removal by the next cull pass.
    Terminal,
}

impl Vitality {
    /// Vitality of a freshly born alien.
    #[must_use]
    pub const fn newborn() -> Self {
        Self::Alive {
            health: INITIAL_HEALTH,
        }
    }

    /// Advances the phase by one frame.
    ///
    /// `caught` only matters while alive. Dying critters count one frame per
    /// call regardless of `dt`.
    #[must_use]
    pub fn step(self, dt: f32, caught: bool) -> Self {
        match self {
            Self::Alive { health } if caught => {
                let remaining = health.saturating_sub(damage_for(dt));
                if remaining <= 0 {
                    Self::Dying { frame: 1 }
                } else {
                    Self::Alive { health: remaining }
                }
            }
            Self::Alive { .. } => self,
            Self::Dying { frame } if frame >= FINAL_DYING_FRAME => Self::Terminal,
            Self::Dying { frame } => Self::Dying { frame: frame + 1 },
            Self::Terminal => Self::Terminal,
        }
    }

    /// Signed health value equivalent to this phase.
    #[must_use]
    pub fn health(self) -> i32 {
        match self {
            Self::Alive { health } => health,
            Self::Dying { frame } => -i32::from(frame),
            Self::Terminal => DEATH_THRESHOLD,
        }
    }

    /// Reports whether the critter is still in its healthy phase.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive { .. })
    }

    /// Reports whether the critter is eligible for removal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// Health removed from a caught alien during a frame lasting `dt` seconds.
///
/// Fractional points round up so that continuous capture kills within
/// [`KILL_TIME`]. Truncating would leave one point after two 50 ms frames, so
/// recordings made with truncated damage do not replay bit for bit here.
/// Oversized frames saturate instead of wrapping.
#[must_use]
pub fn damage_for(dt: f32) -> i32 {
    let damage = (dt * (INITIAL_HEALTH as f32 / KILL_TIME)).ceil();
    damage as i32
}

/// Applies proximity damage to an alien and refreshes its amplitude.
///
/// Returns `true` on the frame the alien leaves its healthy phase.
pub(crate) fn resolve(
    critter: &mut Critter,
    reference: PixelPoint,
    kill_radius_squared: f32,
    dt: f32,
) -> bool {
    let was_alive = critter.vitality.is_alive();
    let caught =
        was_alive && critter.position().distance_squared(reference) <= kill_radius_squared;

    critter.vitality = critter.vitality.step(dt, caught);
    critter.show = caught || !critter.vitality.is_alive();

    if critter.vitality.is_alive() {
        critter.amplitude = critter.progress.sqrt();
    } else {
        critter.amplitude -= dt / AMPLITUDE_DIE_TIME;
        if critter.amplitude < 0.0 {
            critter.vitality = Vitality::Terminal;
        }
    }

    was_alive && !critter.vitality.is_alive()
}
