//! Generate perfect mazes with a randomized depth-first backtracker
//!
//! A perfect maze has exactly one path between any two cells: its open
//! passages form a spanning tree over the grid. The generator walks from
//! the top-left cell into random unvisited neighbors, knocking down walls
//! as it goes, and backtracks along its path whenever it gets stuck.
//!
//! # Examples
//! ## Instant generation
//! ```
//! use mazegen::{render_text, Generator};
//!
//! let mut generator = Generator::new(8, 5, Some(2024)).unwrap();
//! generator.run_to_completion();
//!
//! assert!(generator.is_complete());
//! assert!(generator.grid().is_perfect_maze());
//! println!("{}", render_text(generator.grid(), None));
//! ```
//!
//! ## Animated generation
//! The caller owns the frame loop and ticks the generator once per frame.
//! ```
//! use mazegen::{AnimationPhase, Generator, NullRenderer, StepsPerTick, TickOutcome};
//!
//! let mut generator = Generator::new(10, 10, Some(1)).unwrap();
//! generator.start(true);
//!
//! let speed = StepsPerTick::from_input("25");
//! while generator.tick(speed, &mut NullRenderer) == TickOutcome::Scheduled {
//!     // wait for the next frame here
//! }
//! assert_eq!(generator.phase(), AnimationPhase::Idle);
//! assert!(generator.grid().is_perfect_maze());
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod grid;
pub mod maze_generator;
pub mod render;
pub mod scheduler;

pub use animation::{AnimationPhase, Start, StopCallback, TickOutcome};
pub use config::{LiveRate, RateSource, RunConfig, StepsPerTick};
pub use error::MazeError;
pub use grid::{Cell, Direction, Grid, Point, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use maze_generator::{Generator, Step};
pub use render::{render_text, Frame, NullRenderer, Region, Renderer, TerminalRenderer};
pub use scheduler::{run_animation, FrameClock, FrameScheduler, DEFAULT_FRAME};
