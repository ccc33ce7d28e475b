//! CLI for maze generation

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mazegen::{
    render_text, run_animation, FrameClock, FrameScheduler, Generator, RunConfig, StepsPerTick,
    TerminalRenderer, TickOutcome, DEFAULT_FRAME, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate a perfect maze, optionally watching it being carved
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Maze height in cells
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Animate the generation on the terminal
    #[arg(short, long)]
    animate: bool,

    /// Steps per frame while animating. Invalid values fall back to 1.
    #[arg(short, long, default_value = "1")]
    speed: String,

    /// Frame length in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_FRAME.as_millis() as u64)]
    frame_ms: u64,

    /// Frame pacing
    #[arg(long, value_enum, default_value_t = SchedulerArg::Auto)]
    scheduler: SchedulerArg,

    /// More logging on stderr (-v, -vv). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SchedulerArg {
    /// Pace to frames on a terminal, poll otherwise
    Auto,
    Native,
    Polling,
}

impl SchedulerArg {
    fn resolve(self) -> FrameScheduler {
        match self {
            SchedulerArg::Auto => FrameScheduler::detect(),
            SchedulerArg::Native => FrameScheduler::NativeFrameScheduler,
            SchedulerArg::Polling => FrameScheduler::PollingFallback,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Generate maze, print output
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = RunConfig {
        animate: args.animate,
        steps_per_tick: StepsPerTick::from_input(&args.speed),
    };
    let mut generator = Generator::new(args.width, args.height, args.seed)
        .context("Cannot create maze generator")?;

    if !config.animate {
        generator.start(config.animate);
        println!("{}", render_text(generator.grid(), None));
        info!(perfect = generator.grid().is_perfect_maze(), "done");
        return Ok(());
    }

    let interrupt = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))
        .context("Error setting Ctrl-C handler")?;

    let mut clock = FrameClock::new(
        args.scheduler.resolve(),
        Duration::from_millis(args.frame_ms),
    );
    let mut renderer = TerminalRenderer::new(io::stdout().lock());

    generator.start(config.animate);
    let outcome = run_animation(&mut generator, &mut clock, &config, &mut renderer, &interrupt);
    renderer.finish().context("Cannot draw maze")?;

    match outcome {
        TickOutcome::Stopped => eprintln!(
            "Stopped after {} steps, maze left unfinished.",
            generator.steps_taken()
        ),
        _ => info!(
            steps = generator.steps_taken(),
            perfect = generator.grid().is_perfect_maze(),
            "done"
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use mazegen::{StepsPerTick, DEFAULT_FRAME};

    use crate::Args;

    #[test]
    fn defaults_follow_library_constants() {
        let args = Args::try_parse_from(["generate-maze"]).unwrap();
        assert_eq!(args.frame_ms, DEFAULT_FRAME.as_millis() as u64);
        assert_eq!((args.width, args.height), (40, 40));
        assert!(!args.animate);
        assert_eq!(StepsPerTick::from_input(&args.speed), StepsPerTick::MIN);
    }

    #[test]
    fn speed_is_taken_as_raw_text() {
        let args = Args::try_parse_from(["generate-maze", "--animate", "--speed", "abc"]).unwrap();
        assert!(args.animate);
        assert_eq!(StepsPerTick::from_input(&args.speed), StepsPerTick::MIN);
    }
}
