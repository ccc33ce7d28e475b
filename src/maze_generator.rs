//! Maze generation
//!
//! Randomized depth-first search with backtracking: walk from the origin
//! into a random unvisited neighbor, knocking down the wall in between,
//! and retreat along the walked path whenever the walk is boxed in. The
//! maze is finished when the walk has retreated all the way back to the
//! start.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, trace};

use crate::animation::{AnimationPhase, StopCallback};
use crate::error::MazeError;
use crate::grid::{Direction, Grid, Point};

/// What a single step of the walk did
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Step {
    /// Knocked down a wall and moved into a fresh cell
    Advanced { from: Point, to: Point },
    /// Boxed in, retreated to the previous cell of the path
    Backtracked { from: Point, to: Point },
    /// Boxed in at the start of the path: every cell is visited
    Completed,
}

/// Randomized backtracking maze generator bound to one grid.
pub struct Generator {
    pub(crate) grid: Grid,
    pub(crate) random: StdRng,
    /// Current walk position; `None` once the maze is finished
    pub(crate) cursor: Option<Point>,
    /// Cells walked through to reach the cursor, most recent last
    ///
    /// Never contains the cursor itself.
    pub(crate) history: Vec<Point>,
    pub(crate) steps_taken: usize,
    pub(crate) phase: AnimationPhase,
    pub(crate) stop_callback: Option<StopCallback>,
}

impl Generator {
    /// Create a generator over a fresh `width` x `height` grid.
    ///
    /// With `seed`, the same seed always produces the same maze; without,
    /// the generator is seeded from system entropy.
    pub fn new(width: usize, height: usize, seed: Option<u64>) -> Result<Self, MazeError> {
        let random = if let Some(state) = seed {
            StdRng::seed_from_u64(state)
        } else {
            StdRng::from_entropy()
        };
        Ok(Self::with_rng(Grid::new(width, height)?, random))
    }

    /// Bind a generator to an existing grid. The grid is reset.
    pub fn with_rng(grid: Grid, random: StdRng) -> Self {
        let mut generator = Self {
            grid,
            random,
            cursor: None,
            history: Vec::new(),
            steps_taken: 0,
            phase: AnimationPhase::Idle,
            stop_callback: None,
        };
        generator.reset();
        generator
    }

    /// Start over: fully walled grid, cursor at the origin, empty path.
    ///
    /// Any pending animation is dropped, including a registered stop
    /// callback. Safe to call at any time.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.cursor = Some(Point::new(0, 0));
        self.history.clear();
        self.steps_taken = 0;
        if self.stop_callback.take().is_some() {
            debug!("dropping pending stop callback on reset");
        }
        self.phase = AnimationPhase::Idle;
        debug!(
            width = self.grid.width(),
            height = self.grid.height(),
            "generator reset"
        );
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current walk position, `None` once the maze is complete
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Length of the retreat path behind the cursor
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of steps since the last reset
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_none()
    }

    /// Perform one unit of the walk.
    ///
    /// Returns `true` if this step finished the maze. Stepping a finished
    /// maze does nothing and keeps returning `true`.
    pub fn step(&mut self) -> bool {
        self.advance() == Step::Completed
    }

    /// Perform one unit of the walk and report what it did.
    ///
    /// # Panics
    /// If the walk addresses a cell outside of the grid. The walk only
    /// moves between in-bounds neighbors, so this never happens unless
    /// the generator itself is broken.
    pub fn advance(&mut self) -> Step {
        match self.try_advance() {
            Ok(step) => step,
            Err(err) => panic!("maze generator left the grid: {}", err),
        }
    }

    /// Step until the maze is complete, without any intermediate drawing.
    pub fn run_to_completion(&mut self) {
        while !self.step() {}
    }

    fn try_advance(&mut self) -> Result<Step, MazeError> {
        let Some(current) = self.cursor else {
            return Ok(Step::Completed);
        };
        self.steps_taken += 1;
        self.grid.mark_visited(current)?;

        // Shuffle before scanning so that every open direction is equally
        // likely, whatever the fixed candidate order is.
        let mut directions = Direction::ALL;
        directions.shuffle(&mut self.random);

        let next = directions.into_iter().find_map(|direction| {
            self.grid
                .neighbor(current, direction)
                .filter(|&n| self.grid.cell(n).is_some_and(|c| !c.is_visited()))
                .map(|_| direction)
        });

        if let Some(direction) = next {
            let to = self.grid.open_passage(current, direction)?;
            self.history.push(current);
            self.cursor = Some(to);
            trace!(?current, ?to, "advance");
            return Ok(Step::Advanced { from: current, to });
        }

        match self.history.pop() {
            Some(previous) => {
                self.cursor = Some(previous);
                trace!(?current, ?previous, "backtrack");
                Ok(Step::Backtracked {
                    from: current,
                    to: previous,
                })
            }
            None => {
                self.cursor = None;
                debug!(steps = self.steps_taken, "maze complete");
                Ok(Step::Completed)
            }
        }
    }
}
