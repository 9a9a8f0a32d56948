#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Zoom transition system that gates alien admission.
//!
//! Zooming in disables births until the field is fully revealed, then opens
//! the population cap. Zooming out shrinks the field until it collapses,
//! which ends the round.

use std::time::Duration;

use frequon_core::{Command, Event};

/// Zoom amount gained per second, derived from 60/64 per frame at 60 frames per second.
pub const ZOOM_RATE: f32 = 60.0 / 64.0;

const MIN_BOX_SCALE: f32 = 1.0;
const MAX_BOX_SCALE: f32 = 16.0;

/// Direction of the zoom transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoomDirection {
    /// Reveal the field from nothing.
    Grow,
    /// Shrink the field from its current size.
    Shrink,
}

/// Configuration parameters required to construct the zoom system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    full_zoom_cap: usize,
}

impl Config {
    /// Creates a configuration opening the provided cap once fully zoomed.
    #[must_use]
    pub const fn new(full_zoom_cap: usize) -> Self {
        Self { full_zoom_cap }
    }

    /// Regular play: one alien at a time.
    #[must_use]
    pub const fn game() -> Self {
        Self::new(1)
    }

    /// Benchmark mode: a crowded field.
    #[must_use]
    pub const fn benchmark() -> Self {
        Self::new(8)
    }

    /// Cap applied when the zoom completes.
    #[must_use]
    pub const fn full_zoom_cap(&self) -> usize {
        self.full_zoom_cap
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::game()
    }
}

/// Pure system that tracks the zoom amount and emits population cap commands.
#[derive(Debug)]
pub struct Zoom {
    full_zoom_cap: usize,
    rate: f32,
    amount: f32,
}

impl Zoom {
    /// Creates a new zoom system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            full_zoom_cap: config.full_zoom_cap,
            rate: 0.0,
            amount: 0.0,
        }
    }

    /// Starts a transition in the provided direction.
    ///
    /// Growing restarts from an empty field and closes the population cap
    /// until the zoom completes.
    pub fn set_direction(&mut self, direction: ZoomDirection, out: &mut Vec<Command>) {
        match direction {
            ZoomDirection::Grow => {
                self.rate = ZOOM_RATE;
                self.amount = 0.0;
                out.push(Command::ConfigurePopulationCap { max_live: 0 });
            }
            ZoomDirection::Shrink => self.rate = -ZOOM_RATE,
        }
    }

    /// Consumes events and emits cap commands when the zoom completes.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() || self.rate == 0.0 {
            return;
        }

        let mut zoom = self.amount + self.rate * accumulated.as_secs_f32();
        if zoom > 1.0 {
            zoom = 1.0;
            if self.amount < 1.0 {
                tracing::debug!(max_live = self.full_zoom_cap, "zoom complete");
                out.push(Command::ConfigurePopulationCap {
                    max_live: self.full_zoom_cap,
                });
            }
        } else if zoom < 0.0 {
            zoom = 0.0;
        }
        self.amount = zoom;
    }

    /// Current zoom amount in `[0, 1]`.
    #[must_use]
    pub const fn amount(&self) -> f32 {
        self.amount
    }

    /// Fraction of the display occupied by the field box.
    #[must_use]
    pub fn box_fraction(&self) -> f32 {
        MIN_BOX_SCALE / (MIN_BOX_SCALE + (MAX_BOX_SCALE - MIN_BOX_SCALE) * (1.0 - self.amount))
    }

    /// Reports whether a shrinking zoom has collapsed the field entirely.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.rate < 0.0 && self.amount <= 0.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
