//! Cell storage for the maze

use std::collections::VecDeque;

use crate::error::MazeError;

/// Default maze width, in cells
pub const DEFAULT_WIDTH: usize = 40;
/// Default maze height, in cells
pub const DEFAULT_HEIGHT: usize = 40;

/// Location in the grid
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Direction of a move from one cell to its neighbor
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// All directions, in the order that candidate moves are considered
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
        }
    }

    /// Wall bit on the side of a cell facing this direction
    const fn wall(self) -> u8 {
        match self {
            Direction::Up => Cell::TOP,
            Direction::Left => Cell::LEFT,
            Direction::Down => Cell::BOTTOM,
            Direction::Right => Cell::RIGHT,
        }
    }
}

/// One grid position: four walls and a visited flag
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Cell {
    walls: u8,
    visited: bool,
}

impl Cell {
    const TOP: u8 = 0b0001;
    const LEFT: u8 = 0b0010;
    const BOTTOM: u8 = 0b0100;
    const RIGHT: u8 = 0b1000;
    const ALL_WALLS: u8 = Self::TOP | Self::LEFT | Self::BOTTOM | Self::RIGHT;

    /// Fully walled, unvisited cell
    pub const fn new() -> Self {
        Self {
            walls: Self::ALL_WALLS,
            visited: false,
        }
    }

    pub fn top(&self) -> bool {
        self.has_wall(Direction::Up)
    }

    pub fn left(&self) -> bool {
        self.has_wall(Direction::Left)
    }

    pub fn bottom(&self) -> bool {
        self.has_wall(Direction::Down)
    }

    pub fn right(&self) -> bool {
        self.has_wall(Direction::Right)
    }

    /// Is the side facing `direction` still walled?
    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls & direction.wall() != 0
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    fn remove_wall(&mut self, direction: Direction) {
        self.walls &= !direction.wall();
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-size rectangular array of cells
///
/// Cells are stored row by row, addressed by `y * width + x`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate a `width` x `height` grid of fully walled, unvisited cells.
    ///
    /// Returns [MazeError::InvalidDimension] if either side is zero or the
    /// grid is too large to allocate.
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        let invalid = MazeError::InvalidDimension { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let len = width.checked_mul(height).ok_or_else(|| invalid.clone())?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| invalid)?;
        cells.resize(len, Cell::new());
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Put every cell back into the fully walled, unvisited state
    pub fn reset(&mut self) {
        self.cells.fill(Cell::new());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    /// Cell at (x, y), or `None` outside of the grid
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cell(Point::new(x, y))
    }

    pub fn cell(&self, point: Point) -> Option<&Cell> {
        self.index(point).map(|i| &self.cells[i])
    }

    /// All cells with their coordinates, row by row
    pub fn cells(&self) -> impl Iterator<Item = (Point, &Cell)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Point::new(i % width, i / width), cell))
    }

    /// Neighboring position in `direction`, if it is inside the grid
    pub fn neighbor(&self, point: Point, direction: Direction) -> Option<Point> {
        let next = match direction {
            Direction::Up => Point::new(point.x, point.y.checked_sub(1)?),
            Direction::Left => Point::new(point.x.checked_sub(1)?, point.y),
            Direction::Down => Point::new(point.x, point.y + 1),
            Direction::Right => Point::new(point.x + 1, point.y),
        };
        self.contains(next).then_some(next)
    }

    pub(crate) fn mark_visited(&mut self, point: Point) -> Result<(), MazeError> {
        let i = self.checked_index(point)?;
        self.cells[i].visited = true;
        Ok(())
    }

    /// Clear the wall pair between `point` and its neighbor in `direction`.
    ///
    /// Returns the neighbor position.
    pub(crate) fn open_passage(
        &mut self,
        point: Point,
        direction: Direction,
    ) -> Result<Point, MazeError> {
        let from = self.checked_index(point)?;
        let next = self
            .neighbor(point, direction)
            .ok_or(MazeError::OutOfBounds {
                x: point.x,
                y: point.y,
            })?;
        let to = self.checked_index(next)?;

        self.cells[from].remove_wall(direction);
        self.cells[to].remove_wall(direction.opposite());
        Ok(next)
    }

    /// Opened wall pairs, each reported once from its upper or left cell
    pub fn passages(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.cells().flat_map(move |(point, cell)| {
            [Direction::Down, Direction::Right]
                .into_iter()
                .filter(move |&d| !cell.has_wall(d))
                .filter_map(move |d| self.neighbor(point, d).map(|next| (point, next)))
        })
    }

    /// Every wall pair between adjacent cells is either intact or open on
    /// both sides, and the outer boundary is intact.
    pub fn walls_symmetric(&self) -> bool {
        self.cells().all(|(point, cell)| {
            Direction::ALL
                .into_iter()
                .all(|d| match self.neighbor(point, d).and_then(|n| self.cell(n)) {
                    Some(other) => cell.has_wall(d) == other.has_wall(d.opposite()),
                    None => cell.has_wall(d),
                })
        })
    }

    /// Do the open passages form a spanning tree over the whole grid?
    ///
    /// Checks that exactly `len - 1` wall pairs are open and that a flood
    /// fill from the origin through open passages reaches every cell.
    pub fn is_perfect_maze(&self) -> bool {
        if !self.walls_symmetric() || self.passages().count() != self.len() - 1 {
            return false;
        }

        let mut seen = vec![false; self.len()];
        let mut queue = VecDeque::from([Point::new(0, 0)]);
        seen[0] = true;
        let mut reached = 1;

        while let Some(point) = queue.pop_front() {
            let cell = &self.cells[point.y * self.width + point.x];
            for d in Direction::ALL {
                if cell.has_wall(d) {
                    continue;
                }
                if let Some(next) = self.neighbor(point, d) {
                    let i = next.y * self.width + next.x;
                    if !seen[i] {
                        seen[i] = true;
                        reached += 1;
                        queue.push_back(next);
                    }
                }
            }
        }
        reached == self.len()
    }

    fn index(&self, point: Point) -> Option<usize> {
        self.contains(point)
            .then(|| point.y * self.width + point.x)
    }

    fn checked_index(&self, point: Point) -> Result<usize, MazeError> {
        self.index(point).ok_or(MazeError::OutOfBounds {
            x: point.x,
            y: point.y,
        })
    }
}
