#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Frequon population headlessly.
//!
//! The player's tracked position is replaced by a Lissajous sweep across the
//! field so aliens are born, caught, and culled without a camera.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use frequon_core::{Command, Event, PixelPoint, PopulationConfig};
use frequon_system_zoom::{Config as ZoomConfig, Zoom, ZoomDirection};
use frequon_universe::{self as universe, query, Field, Universe, MAX_CRITTERS};
use tracing_subscriber::EnvFilter;

/// Horizontal angular speed of the reference sweep, in radians per second.
const SWEEP_X: f32 = 0.7;
/// Vertical angular speed of the reference sweep, in radians per second.
const SWEEP_Y: f32 = 1.1;

#[derive(Debug, Parser)]
#[command(name = "frequon")]
#[command(about = "Run the Frequon critter population without a display")]
struct Args {
    /// Field width in pixels
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Field height in pixels
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Number of frames to simulate before zooming out
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Seed for the birth process
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// TOML file holding the population configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of simultaneously live aliens once fully zoomed
    #[arg(long)]
    max_live: Option<usize>,

    /// Expected admissions per second
    #[arg(long)]
    birth_rate: Option<f32>,

    /// Speed of newly born aliens in pixels per second
    #[arg(long)]
    velocity_max: Option<f32>,

    /// Crowd the field and report simulation throughput
    #[arg(long)]
    benchmark: bool,
}

/// Event totals gathered over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Summary {
    frames: u32,
    zoom_out_frames: u32,
    births: usize,
    catches: usize,
    culls: usize,
    live_aliens: usize,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::CritterBorn { .. } => self.births += 1,
                Event::CritterCaught { .. } => self.catches += 1,
                Event::CritterCulled { .. } => self.culls += 1,
                Event::FieldReset { .. }
                | Event::TimeAdvanced { .. }
                | Event::PopulationCapChanged { .. } => {}
            }
        }
    }
}

/// Entry point for the Frequon command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = population_config(&args)?;

    let started = Instant::now();
    let summary = run(&args, config);
    let elapsed = started.elapsed();

    println!(
        "frequon: {} frames at {} fps on {}x{} (seed {})",
        summary.frames, args.fps, args.width, args.height, args.seed
    );
    println!("zoom-out frames: {}", summary.zoom_out_frames);
    println!("births: {}", summary.births);
    println!("catches: {}", summary.catches);
    println!("culls: {}", summary.culls);
    println!("live aliens: {}", summary.live_aliens);
    if args.benchmark {
        let simulated = summary.frames + summary.zoom_out_frames;
        let seconds = elapsed.as_secs_f64();
        let rate = if seconds > 0.0 {
            f64::from(simulated) / seconds
        } else {
            f64::INFINITY
        };
        println!("elapsed: {seconds:.3}s ({rate:.0} frames/s)");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Resolves the population configuration from the file, flags, and mode.
fn population_config(args: &Args) -> Result<PopulationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PopulationConfig {
            max_live: default_cap(args.benchmark),
            ..PopulationConfig::default()
        },
    };

    if let Some(max_live) = args.max_live {
        config.max_live = max_live;
    }
    if let Some(birth_rate) = args.birth_rate {
        config.birth_rate = birth_rate;
    }
    if let Some(velocity_max) = args.velocity_max {
        config.velocity_max = velocity_max;
    }

    config
        .validate(MAX_CRITTERS)
        .context("population configuration rejected")?;
    Ok(config)
}

fn default_cap(benchmark: bool) -> usize {
    if benchmark {
        ZoomConfig::benchmark().full_zoom_cap()
    } else {
        ZoomConfig::game().full_zoom_cap()
    }
}

fn load_config(path: &Path) -> Result<PopulationConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read population config {}", path.display()))?;
    parse_config(&text)
        .with_context(|| format!("failed to parse population config {}", path.display()))
}

fn parse_config(text: &str) -> Result<PopulationConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Zooms in, simulates the requested frames, then zooms out until the field collapses.
fn run(args: &Args, config: PopulationConfig) -> Summary {
    let mut universe = Universe::new(args.seed);
    let mut zoom = Zoom::new(ZoomConfig::new(config.max_live));
    let mut summary = Summary::default();
    let mut events = Vec::new();
    let mut commands = vec![
        Command::Reset {
            width: args.width,
            height: args.height,
        },
        Command::ConfigureBirthRate {
            per_second: config.birth_rate,
        },
        Command::ConfigureVelocityMax {
            pixels_per_second: config.velocity_max,
        },
    ];
    zoom.set_direction(ZoomDirection::Grow, &mut commands);
    for command in commands.drain(..) {
        universe::apply(&mut universe, command, &mut events);
    }
    summary.record(&events);

    let dt = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let mut elapsed = 0.0;
    let mut step = |universe: &mut Universe, zoom: &mut Zoom, summary: &mut Summary| {
        events.clear();
        let reference = lissajous(elapsed, query::field(universe));
        universe::apply(universe, Command::Tick { dt, reference }, &mut events);
        zoom.handle(&events, &mut commands);
        for command in commands.drain(..) {
            universe::apply(universe, command, &mut events);
        }
        summary.record(&events);
        elapsed += dt.as_secs_f32();
    };

    for _ in 0..args.frames {
        step(&mut universe, &mut zoom, &mut summary);
        summary.frames += 1;
    }

    zoom.set_direction(ZoomDirection::Shrink, &mut Vec::new());
    tracing::info!(amount = zoom.amount(), "zooming out");
    while !zoom.is_collapsed() {
        step(&mut universe, &mut zoom, &mut summary);
        summary.zoom_out_frames += 1;
    }

    summary.live_aliens = query::alien_count(&universe);
    let field = query::field(&universe);
    tracing::info!(
        width = field.width(),
        height = field.height(),
        births = summary.births,
        catches = summary.catches,
        culls = summary.culls,
        live = summary.live_aliens,
        "run complete"
    );
    summary
}

/// Reference position after `t` seconds of sweeping the field.
fn lissajous(t: f32, field: &Field) -> PixelPoint {
    let x = field.x_limit() * 0.5 * (1.0 + (SWEEP_X * t).sin());
    let y = field.y_limit() * 0.5 * (1.0 + (SWEEP_Y * t).sin());
    PixelPoint::new(x.clamp(0.0, field.x_limit()), y.clamp(0.0, field.y_limit()))
}
