//! Stochastic admission of new aliens.

use std::f32::consts::TAU;

use frequon_core::{CritterId, PixelPoint, PopulationConfig};
use rand::Rng;

use crate::{arena::Arena, Critter, Field, Vitality, MAX_CRITTERS};

/// Scale of the per-alien maturation rate, in progress per second.
pub const FALL_RATE_SCALE: f32 = 0.0256;

/// Admits at most one alien, returning its id and spawn position.
///
/// Admission happens with probability `dt * birth_rate` while the alien count
/// is below the configured cap.
///
/// # Panics
///
/// Panics when the cap leaves no room for the reference entity or when the
/// live alien count already exceeds the cap.
pub(crate) fn try_birth<R>(
    arena: &mut Arena,
    field: &Field,
    config: &PopulationConfig,
    dt: f32,
    rng: &mut R,
) -> Option<(CritterId, PixelPoint)>
where
    R: Rng + ?Sized,
{
    let usable = MAX_CRITTERS - 1;
    if config.max_live > usable {
        panic!(
            "birth: max_live={} exceeds usable capacity {usable}",
            config.max_live
        );
    }
    let live_aliens = arena.len().saturating_sub(1);
    if live_aliens > config.max_live {
        panic!(
            "birth: live aliens {live_aliens} exceed max_live={}",
            config.max_live
        );
    }
    if live_aliens >= config.max_live {
        return None;
    }
    if rng.gen::<f32>() > dt * config.birth_rate {
        return None;
    }

    let available = MAX_CRITTERS - arena.len();
    let free_offset = rng.gen_range(0..available);
    let critter = arena.admit(free_offset);
    initialise_alien(critter, field, config.velocity_max, rng);
    Some((critter.id, critter.position()))
}

/// Writes the birth state into a freshly admitted slot.
///
/// The two velocity components take independent angles, which biases
/// trajectories toward the diagonals. Replays depend on this distribution.
fn initialise_alien<R>(critter: &mut Critter, field: &Field, velocity_max: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    critter.x = rng.gen::<f32>() * field.x_limit();
    critter.y = rng.gen::<f32>() * field.y_limit();

    critter.vx = (TAU * rng.gen::<f32>()).cos() * velocity_max;
    critter.vy = (TAU * rng.gen::<f32>()).sin() * velocity_max;

    critter.amplitude = 0.0;
    critter.progress = 0.0;
    critter.fall_rate = (rng.gen::<f32>() + 1.0) * FALL_RATE_SCALE;

    critter.vitality = Vitality::newborn();
    critter.show = false;
}
