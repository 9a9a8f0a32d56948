//! Entity record stored in every arena slot.

use frequon_core::{CritterId, PixelPoint};

use crate::Vitality;

/// Amplitude sentinel carried only by the reference entity.
pub(crate) const REFERENCE_AMPLITUDE: f32 = -1.0;

/// Simulated entity: an alien, or the reference marker in slot 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Critter {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) amplitude: f32,
    pub(crate) progress: f32,
    pub(crate) fall_rate: f32,
    pub(crate) vitality: Vitality,
    pub(crate) show: bool,
    pub(crate) id: CritterId,
}

impl Critter {
    /// Contents of a slot outside the live prefix. Only the id is meaningful.
    pub(crate) const fn vacant(id: CritterId) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            amplitude: 0.0,
            progress: 0.0,
            fall_rate: 0.0,
            vitality: Vitality::Terminal,
            show: false,
            id,
        }
    }

    pub(crate) const fn reference(id: CritterId) -> Self {
        Self {
            amplitude: REFERENCE_AMPLITUDE,
            vitality: Vitality::newborn(),
            ..Self::vacant(id)
        }
    }

    /// Position in pixels.
    #[must_use]
    pub const fn position(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    /// Velocity in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    /// Amplitude in `[0, 1]` for aliens; `-1` for the reference entity.
    #[must_use]
    pub const fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Maturation progress, unclamped.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the renderer should draw the critter in the space view.
    #[must_use]
    pub const fn show(&self) -> bool {
        self.show
    }

    /// Stable identity tag, preserved across slot moves.
    #[must_use]
    pub const fn id(&self) -> CritterId {
        self.id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn vitality(&self) -> Vitality {
        self.vitality
    }

    /// Signed health equivalent of the lifecycle phase.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.vitality.health()
    }

    /// Death-animation image index: 0 while alive, then counting up per frame.
    #[must_use]
    pub fn image_index(&self) -> usize {
        let health = self.health();
        if health >= 0 {
            0
        } else {
            health.unsigned_abs() as usize
        }
    }

    /// Reports whether this is the reference entity.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.amplitude == REFERENCE_AMPLITUDE
    }
}
