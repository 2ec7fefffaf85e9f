//! N-Body Gravity Simulation
//!
//! Seeds a disc of bodies around a heavy center and steps it on the CPU or the
//! GPU, one frame at a time.

use clap::{Parser, ValueEnum};
use nbody_physics::{constants, diagnostics};
use nbody_renderer::{Frame, FramePacer, FrameSink, HeadlessSink, SinkStatus, SpriteBatch};
use nbody_simulation::{ExecutionMode, KernelSource, SimParams, Simulation};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Direct summation on the CPU
    Sequential,
    /// wgpu compute shaders, one lane per body
    Parallel,
}

impl From<Mode> for ExecutionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sequential => ExecutionMode::Sequential,
            Mode::Parallel => ExecutionMode::Parallel,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about = "Brute-force gravitational N-body simulation")]
struct Args {
    /// Execution strategy; parallel falls back to sequential without a GPU
    #[arg(long, value_enum, default_value = "parallel")]
    mode: Mode,

    /// Number of bodies, including the central mass
    #[arg(long, default_value_t = constants::BODY_COUNT)]
    bodies: usize,

    /// Stop after this many frames (runs until interrupted if unset)
    #[arg(long)]
    frames: Option<u64>,

    /// Target frame rate; 0 disables pacing
    #[arg(long, default_value_t = 165.0)]
    fps: f32,

    #[arg(long, default_value_t = constants::DOMAIN_WIDTH)]
    width: f32,

    #[arg(long, default_value_t = constants::DOMAIN_HEIGHT)]
    height: f32,

    /// Load the WGSL kernels from this file instead of the built-in copy
    #[arg(long)]
    kernel: Option<PathBuf>,

    /// Log a status line every N frames
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn run(args: Args) -> Result<(), nbody_simulation::SimulationError> {
    let params = SimParams {
        domain_width: args.width,
        domain_height: args.height,
        ..SimParams::default()
    };
    let kernel = args.kernel.map(KernelSource::File).unwrap_or_default();

    let mut sim = Simulation::new(params, args.bodies, args.mode.into(), &kernel);
    let mut sink = HeadlessSink::new(args.frames);
    let mut pacer = FramePacer::new(args.fps);
    let mut sprites = SpriteBatch::default();

    let initial_energy = diagnostics::total_energy(sim.bodies(), params.gravity, params.softening);
    log::info!("Initial energy: {:.4}", initial_energy);

    if args.frames == Some(0) {
        return Ok(());
    }

    loop {
        pacer.begin_frame();

        let start = Instant::now();
        sim.step()?;
        let sim_time = start.elapsed();

        sprites.update(sim.bodies(), params.domain_width, params.domain_height);
        let status = sink.present(&Frame {
            index: sim.frame(),
            sprites: &sprites,
            sim_time,
        });

        let stats = pacer.end_frame(sim_time);

        if args.report_every > 0 && sim.frame() % args.report_every == 0 {
            log::info!(
                "Bodies: {} | Mode: {} | Sim Time: {}μs | FPS: {:.0}",
                sim.bodies().len(),
                sim.mode(),
                stats.sim_time.as_micros(),
                stats.fps
            );
            log::debug!(
                "momentum {:?}, energy drift {:.3e}",
                diagnostics::total_momentum(sim.bodies()),
                (diagnostics::total_energy(sim.bodies(), params.gravity, params.softening)
                    - initial_energy)
                    / initial_energy.abs().max(f64::EPSILON)
            );
        }

        if status == SinkStatus::Closed {
            break;
        }
    }

    log::info!("Finished after {} frames", sim.frame());
    Ok(())
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting N-body simulation...");

    if let Err(err) = run(args) {
        log::error!("Simulation failed: {err}");
        std::process::exit(1);
    }
}
