//! Frame loop driving an animated generator

use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::animation::{AnimationPhase, TickOutcome};
use crate::config::RateSource;
use crate::maze_generator::Generator;
use crate::render::Renderer;

/// Default frame length, roughly one display refresh
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// How ticks get paced
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum FrameScheduler {
    /// One tick per display frame
    NativeFrameScheduler,
    /// No display to sync with: tick again after a minimal pause
    PollingFallback,
}

impl FrameScheduler {
    /// Pause between ticks when polling
    pub const POLLING_INTERVAL: Duration = Duration::from_millis(1);

    /// Pick the scheduler available to this process: frame pacing when
    /// stdout is a terminal, polling otherwise.
    pub fn detect() -> Self {
        if io::stdout().is_terminal() {
            FrameScheduler::NativeFrameScheduler
        } else {
            FrameScheduler::PollingFallback
        }
    }

    /// Time between ticks for the given frame length
    pub fn interval(self, frame: Duration) -> Duration {
        match self {
            FrameScheduler::NativeFrameScheduler => frame,
            FrameScheduler::PollingFallback => Self::POLLING_INTERVAL,
        }
    }
}

/// Paces ticks at a fixed interval
#[derive(Debug)]
pub struct FrameClock {
    interval: Duration,
    next_frame: Instant,
}

impl FrameClock {
    pub fn new(scheduler: FrameScheduler, frame: Duration) -> Self {
        let interval = scheduler.interval(frame);
        debug!(?scheduler, ?interval, "frame clock");
        Self {
            interval,
            next_frame: Instant::now() + interval,
        }
    }

    /// Sleep until the next frame is due.
    ///
    /// A late frame is not made up for: the following one is scheduled a
    /// full interval after it.
    pub fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        if self.next_frame > now {
            thread::sleep(self.next_frame - now);
        }
        self.next_frame = self.next_frame.max(now) + self.interval;
    }
}

/// Tick `generator` once per frame until it goes idle.
///
/// The rate is read from `rate` at every tick. Setting `interrupt`
/// requests a stop, which the following tick observes. Returns the
/// outcome of the last tick.
pub fn run_animation<S, R>(
    generator: &mut Generator,
    clock: &mut FrameClock,
    rate: &S,
    renderer: &mut R,
    interrupt: &AtomicBool,
) -> TickOutcome
where
    S: RateSource + ?Sized,
    R: Renderer + ?Sized,
{
    let mut ticks = 0usize;
    loop {
        if interrupt.swap(false, Ordering::Relaxed) {
            generator.request_stop();
        }
        let outcome = generator.tick(rate.steps_per_tick(), renderer);
        ticks += 1;
        if generator.phase() == AnimationPhase::Idle {
            info!(ticks, ?outcome, "frame loop done");
            return outcome;
        }
        clock.wait_for_next_frame();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    use super::{run_animation, FrameClock, FrameScheduler};
    use crate::animation::TickOutcome;
    use crate::config::{RunConfig, StepsPerTick};
    use crate::maze_generator::Generator;
    use crate::render::NullRenderer;

    fn clock() -> FrameClock {
        FrameClock::new(FrameScheduler::NativeFrameScheduler, Duration::ZERO)
    }

    #[test]
    fn polling_ignores_frame_length() {
        let frame = Duration::from_millis(40);
        assert_eq!(FrameScheduler::NativeFrameScheduler.interval(frame), frame);
        assert_eq!(
            FrameScheduler::PollingFallback.interval(frame),
            FrameScheduler::POLLING_INTERVAL
        );
    }

    #[test]
    fn loop_runs_until_the_maze_is_done() {
        let mut gen = Generator::new(7, 7, Some(17)).unwrap();
        gen.start(true);
        let ticks = Cell::new(0);
        let rate = || {
            ticks.set(ticks.get() + 1);
            StepsPerTick::new(4).unwrap()
        };

        let outcome = run_animation(
            &mut gen,
            &mut clock(),
            &rate,
            &mut NullRenderer,
            &AtomicBool::new(false),
        );

        assert_eq!(outcome, TickOutcome::Finished);
        assert!(gen.grid().is_perfect_maze());
        assert_eq!(ticks.get(), gen.steps_taken().div_ceil(4));

        let mut instant = Generator::new(7, 7, Some(17)).unwrap();
        instant.run_to_completion();
        assert_eq!(gen.grid(), instant.grid());
    }

    #[test]
    fn interrupt_stops_before_any_step() {
        let mut gen = Generator::new(5, 5, Some(2)).unwrap();
        gen.start(true);
        let interrupt = AtomicBool::new(true);

        let outcome = run_animation(
            &mut gen,
            &mut clock(),
            &StepsPerTick::MIN,
            &mut NullRenderer,
            &interrupt,
        );

        assert_eq!(outcome, TickOutcome::Stopped);
        assert_eq!(gen.steps_taken(), 0);
        assert!(!gen.is_complete());
    }

    #[test]
    fn idle_generator_returns_immediately() {
        let mut gen = Generator::new(5, 5, Some(2)).unwrap();
        let outcome = run_animation(
            &mut gen,
            &mut clock(),
            &StepsPerTick::MIN,
            &mut NullRenderer,
            &AtomicBool::new(false),
        );
        assert_eq!(outcome, TickOutcome::NotRunning);
    }

    #[test]
    fn run_config_drives_start_and_rate() {
        let config = RunConfig {
            animate: true,
            steps_per_tick: StepsPerTick::new(1000).unwrap(),
        };
        let mut gen = Generator::new(6, 6, Some(3)).unwrap();
        gen.start(config.animate);

        let outcome = run_animation(
            &mut gen,
            &mut clock(),
            &config,
            &mut NullRenderer,
            &AtomicBool::new(false),
        );

        // 36 cells need 71 steps, all inside the first batch
        assert_eq!(outcome, TickOutcome::Finished);
        assert_eq!(gen.steps_taken(), 2 * 36 - 1);
        assert!(gen.grid().is_perfect_maze());
    }
}
