//! Animated generation
//!
//! The generator does not schedule itself. Whoever owns the frame loop
//! calls [Generator::tick] once per frame while [Generator::phase] is not
//! [AnimationPhase::Idle]; each tick runs a batch of steps and draws after
//! every one of them.

use tracing::{debug, info};

use crate::config::StepsPerTick;
use crate::maze_generator::Generator;
use crate::render::{Frame, Region, Renderer};

/// Callback run once animation has actually stopped
pub type StopCallback = Box<dyn FnOnce(&mut Generator)>;

/// Animation state of a generator
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum AnimationPhase {
    /// Nothing scheduled
    #[default]
    Idle,
    /// Ticks are being scheduled
    Running,
    /// Stop requested; the next tick will halt instead of stepping
    StopRequested,
}

/// Result of one tick
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TickOutcome {
    /// Batch done, schedule another tick
    Scheduled,
    /// The maze was completed during this tick
    Finished,
    /// A pending stop was observed; no steps were taken
    Stopped,
    /// The generator was idle; nothing happened
    NotRunning,
}

/// How a [Generator::start] request was handled
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Start {
    /// Fresh maze, ticks should now be scheduled
    Animating,
    /// Fresh maze generated synchronously
    Finished,
    /// Animation in progress; the restart happens once it has stopped
    Deferred,
}

impl Generator {
    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Start generating a new maze.
    ///
    /// When idle, the grid is reset and either animation begins
    /// (`animate`), or the whole maze is generated before returning. When
    /// an animation is in progress, a stop is requested and the restart is
    /// deferred until the stop has been observed by a tick.
    pub fn start(&mut self, animate: bool) -> Start {
        if self.phase != AnimationPhase::Idle {
            debug!(animate, "restart deferred until animation stops");
            self.request_stop();
            self.on_stopped(move |generator| {
                generator.start(animate);
            });
            return Start::Deferred;
        }

        self.reset();
        if animate {
            self.phase = AnimationPhase::Running;
            info!("animation started");
            Start::Animating
        } else {
            self.run_to_completion();
            info!(steps = self.steps_taken, "maze generated");
            Start::Finished
        }
    }

    /// Ask a running animation to stop at the next tick boundary.
    ///
    /// Never interrupts a batch that is already executing. Returns whether
    /// a stop is pending; an idle generator has nothing to stop.
    pub fn request_stop(&mut self) -> bool {
        match self.phase {
            AnimationPhase::Idle => false,
            AnimationPhase::Running => {
                self.phase = AnimationPhase::StopRequested;
                info!(steps = self.steps_taken, "stop requested");
                true
            }
            AnimationPhase::StopRequested => true,
        }
    }

    /// Register `callback` to run once ticks have stopped being scheduled,
    /// either after a requested stop or after the maze completes.
    ///
    /// Replaces a previously registered callback. Runs immediately if the
    /// generator is already idle.
    pub fn on_stopped<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut Generator) + 'static,
    {
        if self.phase == AnimationPhase::Idle {
            callback(self);
        } else {
            self.stop_callback = Some(Box::new(callback));
        }
    }

    /// Run one frame of animation: up to `steps` steps, drawing after each.
    ///
    /// `steps` is passed on every call so the rate can change between
    /// frames.
    pub fn tick<R>(&mut self, steps: StepsPerTick, renderer: &mut R) -> TickOutcome
    where
        R: Renderer + ?Sized,
    {
        match self.phase {
            AnimationPhase::Idle => TickOutcome::NotRunning,
            AnimationPhase::StopRequested => {
                self.phase = AnimationPhase::Idle;
                info!(steps = self.steps_taken, "animation stopped");
                self.fire_stop_callback();
                TickOutcome::Stopped
            }
            AnimationPhase::Running => {
                for _ in 0..steps.get() {
                    let done = self.step();
                    let region = match self.cursor {
                        // First step after a reset repaints everything
                        Some(cursor) if self.steps_taken > 1 => Region::Around(cursor),
                        _ => Region::Full,
                    };
                    renderer.draw(&Frame::new(&self.grid, self.cursor, region));

                    if done {
                        self.phase = AnimationPhase::Idle;
                        renderer.present();
                        info!(steps = self.steps_taken, "animation finished");
                        self.fire_stop_callback();
                        return TickOutcome::Finished;
                    }
                }
                renderer.present();
                TickOutcome::Scheduled
            }
        }
    }

    fn fire_stop_callback(&mut self) {
        if let Some(callback) = self.stop_callback.take() {
            callback(self);
        }
    }
}
