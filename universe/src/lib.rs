#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative population state for the Frequon simulator.
//!
//! A [`Universe`] owns a fixed-capacity arena of critters. Slot 0 is the
//! reference entity driven by the player's tracked position; the remaining
//! live slots are aliens that drift, mature, take damage near the reference,
//! die, and are replaced by the birth process. Nothing is allocated after
//! construction.

use std::time::Duration;

use frequon_core::{Command, Event, PixelPoint, PopulationConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod arena;
mod birth;
mod critter;
mod physics;
mod vitality;

pub use birth::FALL_RATE_SCALE;
pub use critter::Critter;
pub use physics::bounce;
pub use vitality::{
    damage_for, Vitality, AMPLITUDE_DIE_TIME, DEATH_THRESHOLD, INITIAL_HEALTH, KILL_TIME,
};

use arena::Arena;

/// Maximum number of critters, including the reference entity.
pub const MAX_CRITTERS: usize = 16;

/// Kill radius squared per square pixel of field area.
///
/// Equivalent to a radius of `height / 32` on a 16:9 field, while scaling
/// sensibly for other aspect ratios.
const KILL_AREA_FACTOR: f32 = (9.0 / 16.0) / (32.0 * 32.0);

/// Pixel extents of the field and the constants derived from them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    width: f32,
    height: f32,
    kill_radius_squared: f32,
}

impl Field {
    /// Derives field constants for the provided pixel extents.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width as f32;
        let height = height as f32;
        Self {
            width,
            height,
            kill_radius_squared: width * height * KILL_AREA_FACTOR,
        }
    }

    /// Width of the field in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the field in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Largest valid horizontal coordinate.
    #[must_use]
    pub fn x_limit(&self) -> f32 {
        self.width - 1.0
    }

    /// Largest valid vertical coordinate.
    #[must_use]
    pub fn y_limit(&self) -> f32 {
        self.height - 1.0
    }

    /// Squared distance within which the reference entity damages aliens.
    #[must_use]
    pub const fn kill_radius_squared(&self) -> f32 {
        self.kill_radius_squared
    }
}

/// Represents the authoritative population of critters.
#[derive(Debug)]
pub struct Universe<R = ChaCha8Rng> {
    arena: Arena,
    field: Field,
    config: PopulationConfig,
    rng: R,
}

impl Universe<ChaCha8Rng> {
    /// Creates an empty universe drawing from a generator seeded with `seed`.
    ///
    /// The population stays empty until [`Universe::reset`] runs.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Universe<R> {
    /// Creates an empty universe drawing from the provided generator.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            arena: Arena::new(),
            field: Field::new(0, 0),
            config: PopulationConfig::default(),
            rng,
        }
    }

    /// Reinitialises the population for a field of the provided extents.
    ///
    /// Every slot receives the id matching its index and only the reference
    /// entity remains live. The configuration is kept.
    ///
    /// # Panics
    ///
    /// Panics when either extent is zero.
    pub fn reset(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            panic!("reset: field extents must be positive, got width={width} height={height}");
        }
        self.field = Field::new(width, height);
        self.arena.reset();
        tracing::info!(
            width,
            height,
            kill_radius_squared = self.field.kill_radius_squared(),
            "universe reset"
        );
    }

    /// Advances the population by one frame.
    ///
    /// Aliens move and take damage, terminal aliens are culled, and then at
    /// most one alien is born.
    ///
    /// # Panics
    ///
    /// Panics when the population is empty because [`Universe::reset`] never
    /// ran, or when the configuration violates the arena capacity.
    pub fn update(&mut self, dt: Duration, reference: PixelPoint, out_events: &mut Vec<Event>) {
        if self.arena.len() == 0 {
            panic!("update: universe is empty (len=0), reset must run before update");
        }
        out_events.push(Event::TimeAdvanced { dt });
        let seconds = dt.as_secs_f32();

        self.arena.place_reference(reference);
        self.advance_aliens(seconds, reference, out_events);
        self.cull_terminal(out_events);

        if let Some((id, position)) = birth::try_birth(
            &mut self.arena,
            &self.field,
            &self.config,
            seconds,
            &mut self.rng,
        ) {
            tracing::debug!(id = id.get(), x = position.x(), y = position.y(), "critter born");
            out_events.push(Event::CritterBorn { id, position });
        }

        tracing::trace!(live = self.arena.len(), dt = seconds, "universe advanced");
    }

    /// Removes every terminal alien from the live prefix.
    pub fn cull_terminal(&mut self, out_events: &mut Vec<Event>) {
        self.arena.cull_terminal(out_events);
    }

    /// Sets the maximum number of simultaneously live aliens.
    pub fn set_population_cap(&mut self, max_live: usize) {
        self.config.max_live = max_live;
    }

    /// Sets the expected admissions per second.
    pub fn set_birth_rate(&mut self, per_second: f32) {
        self.config.birth_rate = per_second;
    }

    /// Sets the speed assigned to newly born aliens.
    pub fn set_velocity_max(&mut self, pixels_per_second: f32) {
        self.config.velocity_max = pixels_per_second;
    }

    /// Replaces the whole birth configuration.
    pub fn configure(&mut self, config: PopulationConfig) {
        self.config = config;
    }

    fn advance_aliens(&mut self, dt: f32, reference: PixelPoint, out_events: &mut Vec<Event>) {
        let kill_radius_squared = self.field.kill_radius_squared();
        for critter in self.arena.aliens_mut() {
            physics::integrate(critter, &self.field, dt);
            if vitality::resolve(critter, reference, kill_radius_squared, dt) {
                tracing::debug!(id = critter.id.get(), "critter caught");
                out_events.push(Event::CritterCaught { id: critter.id });
            }
        }
    }
}

/// Applies the provided command to the universe, mutating state deterministically.
pub fn apply<R: Rng>(universe: &mut Universe<R>, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Reset { width, height } => {
            universe.reset(width, height);
            out_events.push(Event::FieldReset { width, height });
        }
        Command::Tick { dt, reference } => universe.update(dt, reference, out_events),
        Command::ConfigurePopulationCap { max_live } => {
            universe.set_population_cap(max_live);
            tracing::info!(max_live, "population cap changed");
            out_events.push(Event::PopulationCapChanged { max_live });
        }
        Command::ConfigureBirthRate { per_second } => universe.set_birth_rate(per_second),
        Command::ConfigureVelocityMax { pixels_per_second } => {
            universe.set_velocity_max(pixels_per_second);
        }
    }
}

/// Query functions that provide read-only access to the universe state.
pub mod query {
    use frequon_core::{CritterId, PopulationConfig};

    use super::{Critter, Field, Universe};

    /// Live aliens, excluding the reference entity.
    #[must_use]
    pub fn aliens<R>(universe: &Universe<R>) -> &[Critter] {
        universe.arena.live().get(1..).unwrap_or(&[])
    }

    /// Reference entity, absent until the universe is reset.
    #[must_use]
    pub fn reference<R>(universe: &Universe<R>) -> Option<&Critter> {
        universe.arena.live().first()
    }

    /// Length of the live prefix, including the reference entity.
    #[must_use]
    pub fn live_len<R>(universe: &Universe<R>) -> usize {
        universe.arena.len()
    }

    /// Number of live aliens.
    #[must_use]
    pub fn alien_count<R>(universe: &Universe<R>) -> usize {
        universe.arena.len().saturating_sub(1)
    }

    /// Ids held by every slot of the arena, live or free, in slot order.
    pub fn ids<R>(universe: &Universe<R>) -> impl Iterator<Item = CritterId> + '_ {
        universe.arena.slots().iter().map(Critter::id)
    }

    /// Birth configuration currently in force.
    #[must_use]
    pub fn config<R>(universe: &Universe<R>) -> &PopulationConfig {
        &universe.config
    }

    /// Field extents and derived constants.
    #[must_use]
    pub fn field<R>(universe: &Universe<R>) -> &Field {
        &universe.field
    }

    /// Squared kill radius derived from the field area.
    #[must_use]
    pub fn kill_radius_squared<R>(universe: &Universe<R>) -> f32 {
        universe.field.kill_radius_squared()
    }
}
