//! Reflective integration of alien motion and maturation.

use crate::{Critter, Field};

/// Advances one axis by `dt`, reflecting elastically off `0` and `limit`.
///
/// The overshoot is mirrored around the nearest wall and the velocity
/// negated until the position lies within `[0, limit]`.
///
/// # Panics
///
/// Panics when the starting position lies outside `[0, limit]` or when the
/// tentative position is not finite.
pub fn bounce(position: &mut f32, velocity: &mut f32, limit: f32, dt: f32) {
    let start = *position;
    let mut v = *velocity;
    if !(0.0..=limit).contains(&start) {
        panic!("bounce: position={start} outside [0, {limit}] (velocity={v} dt={dt})");
    }
    if limit <= 0.0 {
        *position = 0.0;
        return;
    }

    let mut s = start + v * dt;
    if !s.is_finite() {
        panic!("bounce: non-finite step from position={start} (velocity={v} limit={limit} dt={dt})");
    }

    // Fold whole periods first; a period is two reflections, so the sign of
    // the velocity is unchanged.
    let period = 2.0 * limit;
    if s < -period || s > period + limit {
        s = s.rem_euclid(period);
    }

    loop {
        if s < 0.0 {
            s = -s;
        } else if s > limit {
            s = period - s;
        } else {
            break;
        }
        v = -v;
    }

    *position = s;
    *velocity = v;
}

/// Moves an alien within the field and advances its maturation.
pub(crate) fn integrate(critter: &mut Critter, field: &Field, dt: f32) {
    bounce(&mut critter.x, &mut critter.vx, field.x_limit(), dt);
    bounce(&mut critter.y, &mut critter.vy, field.y_limit(), dt);
    critter.progress += critter.fall_rate * dt;
}
