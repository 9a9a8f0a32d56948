use std::{
    collections::{hash_map::DefaultHasher, VecDeque},
    hash::{Hash, Hasher},
    time::Duration,
};

use frequon_core::{Command, CritterId, Event, PixelPoint};
use frequon_universe::{self as universe, query, Critter, Universe};
use rand::RngCore;

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(0x4d59_5df4_d0f3_3173, scripted_commands());
    let second = replay(0x4d59_5df4_d0f3_3173, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first
            .events
            .iter()
            .any(|event| matches!(event, EventRecord::CritterBorn { .. })),
        "script should admit aliens"
    );
}

#[test]
fn different_seeds_diverge() {
    let first = replay(1, scripted_commands());
    let second = replay(2, scripted_commands());

    assert_ne!(first.fingerprint(), second.fingerprint());
}

/// Generator replaying scripted words, one per draw, then the largest value.
struct Scripted {
    words: VecDeque<u64>,
}

impl RngCore for Scripted {
    fn next_u32(&mut self) -> u32 {
        self.words.pop_front().map_or(u32::MAX, |word| word as u32)
    }

    fn next_u64(&mut self) -> u64 {
        self.words.pop_front().unwrap_or(u64::MAX)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[test]
fn scripted_draws_replay_to_expected_log() {
    const MIDDLE_SLOT: u64 = 1 << 63;
    const QUARTER: u64 = 0x4000_0000;
    const HALF: u64 = 0x8000_0000;

    // Per birth: admission, free slot, x, y, vx angle, vy angle, fall rate.
    let words = [
        0, MIDDLE_SLOT, HALF, QUARTER, 0, 0, HALF, //
        0, MIDDLE_SLOT, QUARTER, HALF, 0, 0, 0,
    ];
    let mut universe = Universe::with_rng(Scripted {
        words: words.into_iter().collect(),
    });
    let mut events = Vec::new();
    let dt = Duration::from_secs(1);
    let reference = PixelPoint::new(639.0, 479.0);
    for command in [
        Command::Reset {
            width: 640,
            height: 480,
        },
        Command::ConfigurePopulationCap { max_live: 2 },
        Command::ConfigureVelocityMax {
            pixels_per_second: 0.0,
        },
        Command::Tick { dt, reference },
        Command::Tick { dt, reference },
        Command::Tick { dt, reference },
    ] {
        universe::apply(&mut universe, command, &mut events);
    }

    assert_eq!(
        events,
        vec![
            Event::FieldReset {
                width: 640,
                height: 480
            },
            Event::PopulationCapChanged { max_live: 2 },
            Event::TimeAdvanced { dt },
            Event::CritterBorn {
                id: CritterId::new(8),
                position: PixelPoint::new(319.5, 119.75),
            },
            Event::TimeAdvanced { dt },
            Event::CritterBorn {
                id: CritterId::new(9),
                position: PixelPoint::new(159.75, 239.5),
            },
            Event::TimeAdvanced { dt },
        ]
    );

    let positions: Vec<PixelPoint> = query::aliens(&universe)
        .iter()
        .map(Critter::position)
        .collect();
    assert_eq!(
        positions,
        [PixelPoint::new(319.5, 119.75), PixelPoint::new(159.75, 239.5)]
    );
    let ids: Vec<u8> = query::ids(&universe).map(|id| id.get()).collect();
    assert_eq!(ids, [0, 8, 9, 3, 4, 5, 6, 7, 1, 2, 10, 11, 12, 13, 14, 15]);
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut universe = Universe::new(seed);
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        universe::apply(&mut universe, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));
    }

    let aliens = query::aliens(&universe)
        .iter()
        .map(AlienState::from)
        .collect();

    ReplayOutcome {
        aliens,
        events: log,
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::Reset {
            width: 640,
            height: 360,
        },
        Command::ConfigureBirthRate { per_second: 6.0 },
        Command::ConfigureVelocityMax {
            pixels_per_second: 180.0,
        },
        Command::ConfigurePopulationCap { max_live: 8 },
    ];

    for frame in 0..900u32 {
        let t = frame as f32 / 60.0;
        commands.push(Command::Tick {
            dt: Duration::from_micros(16_667),
            reference: PixelPoint::new(320.0 + 250.0 * t.cos(), 180.0 + 140.0 * (2.0 * t).sin()),
        });
        if frame == 600 {
            commands.push(Command::ConfigurePopulationCap { max_live: 12 });
        }
    }

    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    aliens: Vec<AlienState>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct AlienState {
    id: CritterId,
    position_bits: (u32, u32),
    amplitude_bits: u32,
    progress_bits: u32,
    health: i32,
    show: bool,
}

impl From<&Critter> for AlienState {
    fn from(critter: &Critter) -> Self {
        let position = critter.position();
        Self {
            id: critter.id(),
            position_bits: (position.x().to_bits(), position.y().to_bits()),
            amplitude_bits: critter.amplitude().to_bits(),
            progress_bits: critter.progress().to_bits(),
            health: critter.health(),
            show: critter.show(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    FieldReset { width: u32, height: u32 },
    TimeAdvanced { dt_micros: u128 },
    CritterCaught { id: CritterId },
    CritterCulled { id: CritterId },
    CritterBorn { id: CritterId, position_bits: (u32, u32) },
    PopulationCapChanged { max_live: usize },
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::FieldReset { width, height } => Self::FieldReset {
                width: *width,
                height: *height,
            },
            Event::TimeAdvanced { dt } => Self::TimeAdvanced {
                dt_micros: dt.as_micros(),
            },
            Event::CritterCaught { id } => Self::CritterCaught { id: *id },
            Event::CritterCulled { id } => Self::CritterCulled { id: *id },
            Event::CritterBorn { id, position } => Self::CritterBorn {
                id: *id,
                position_bits: (position.x().to_bits(), position.y().to_bits()),
            },
            Event::PopulationCapChanged { max_live } => Self::PopulationCapChanged {
                max_live: *max_live,
            },
        }
    }
}
