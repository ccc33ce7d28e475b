//! Drawing the maze
//!
//! The generator hands a [Frame] to a [Renderer] after every animated
//! step. Renderers only ever see the grid read-only.

use std::fmt;
use std::io::{self, Write};

use itertools::Itertools;

use crate::grid::{Cell, Grid, Point};

/// Part of the grid that changed since the previous frame
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Region {
    /// Anything may have changed
    Full,
    /// Only the cursor cell and its eight surrounding cells changed
    Around(Point),
}

/// Snapshot handed to a renderer
pub struct Frame<'a> {
    grid: &'a Grid,
    cursor: Option<Point>,
    region: Region,
}

impl<'a> Frame<'a> {
    pub fn new(grid: &'a Grid, cursor: Option<Point>, region: Region) -> Self {
        Self {
            grid,
            cursor,
            region,
        }
    }

    /// Frame covering the whole grid
    pub fn full(grid: &'a Grid, cursor: Option<Point>) -> Self {
        Self::new(grid, cursor, Region::Full)
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Cursor position, `None` once the maze is complete
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn in_region(&self, point: Point) -> bool {
        match self.region {
            Region::Full => true,
            Region::Around(center) => {
                point.x.abs_diff(center.x) <= 1 && point.y.abs_diff(center.y) <= 1
            }
        }
    }

    /// All cells inside the region, row by row
    ///
    /// Only the region itself is walked, not the whole grid.
    pub fn cells(&self) -> impl Iterator<Item = (Point, &'a Cell)> + 'a {
        let grid = self.grid;
        let (xs, ys) = match self.region {
            Region::Full => (0..grid.width(), 0..grid.height()),
            Region::Around(center) => (
                center.x.saturating_sub(1)..center.x.saturating_add(2).min(grid.width()),
                center.y.saturating_sub(1)..center.y.saturating_add(2).min(grid.height()),
            ),
        };
        ys.flat_map(move |y| xs.clone().map(move |x| Point::new(x, y)))
            .filter_map(move |p| grid.cell(p).map(|cell| (p, cell)))
    }

    /// Visited cells inside the region
    pub fn visited_cells(&self) -> impl Iterator<Item = (Point, &'a Cell)> + 'a {
        self.cells().filter(|(_, c)| c.is_visited())
    }
}

/// Consumer of generator frames
pub trait Renderer {
    /// Called after every animated step
    fn draw(&mut self, frame: &Frame<'_>);

    /// Called once at the end of every tick
    fn present(&mut self) {}
}

/// Renderer that draws nothing
#[derive(Default, Clone, Copy, Debug)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _frame: &Frame<'_>) {}
}

/// Character picture of a grid
///
/// Every cell is two characters wide and one line high, framed by `+`
/// corners, `--` and `|` walls.
#[derive(Clone, Debug)]
struct Canvas {
    width: usize,
    height: usize,
    rows: Vec<Vec<char>>,
}

impl Canvas {
    const CORNER: char = '+';
    const H_WALL: char = '-';
    const V_WALL: char = '|';
    const OPEN: char = ' ';
    const UNVISITED: char = '#';
    const CURSOR: char = '@';

    fn new(width: usize, height: usize) -> Self {
        let rows = (0..=2 * height)
            .map(|row| {
                (0..=3 * width)
                    .map(|col| match (row % 2, col % 3) {
                        (0, 0) => Self::CORNER,
                        (0, _) => Self::H_WALL,
                        (_, 0) => Self::V_WALL,
                        _ => Self::UNVISITED,
                    })
                    .collect()
            })
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    fn fits(&self, grid: &Grid) -> bool {
        self.width == grid.width() && self.height == grid.height()
    }

    fn paint(&mut self, point: Point, cell: &Cell, is_cursor: bool) {
        let (row, col) = (2 * point.y, 3 * point.x);
        let wall = |present: bool, c: char| if present { c } else { Self::OPEN };

        for dc in 1..=2 {
            self.rows[row][col + dc] = wall(cell.top(), Self::H_WALL);
            self.rows[row + 2][col + dc] = wall(cell.bottom(), Self::H_WALL);
            self.rows[row + 1][col + dc] = if is_cursor {
                Self::CURSOR
            } else if cell.is_visited() {
                Self::OPEN
            } else {
                Self::UNVISITED
            };
        }
        self.rows[row + 1][col] = wall(cell.left(), Self::V_WALL);
        self.rows[row + 1][col + 3] = wall(cell.right(), Self::V_WALL);
    }

    fn paint_frame(&mut self, frame: &Frame<'_>) {
        for (point, cell) in frame.cells() {
            self.paint(point, cell, false);
        }
        if let Some(cursor) = frame.cursor() {
            if let Some(cell) = frame.grid().cell(cursor) {
                self.paint(cursor, cell, true);
            }
        }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.rows.iter().map(|row| row.iter().join("")).join("\n");
        write!(f, "{}", text)
    }
}

/// Draw the whole grid as text, marking the cursor if there is one.
///
/// ```
/// use mazegen::{render_text, Grid};
///
/// let grid = Grid::new(2, 1).unwrap();
/// assert_eq!(render_text(&grid, None), "+--+--+\n|##|##|\n+--+--+");
/// ```
pub fn render_text(grid: &Grid, cursor: Option<Point>) -> String {
    let mut canvas = Canvas::new(grid.width(), grid.height());
    canvas.paint_frame(&Frame::full(grid, cursor));
    canvas.to_string()
}

/// Renderer for an ANSI terminal
///
/// Keeps a character picture of the maze, repaints only the region each
/// frame reports, and redraws the screen once per tick.
pub struct TerminalRenderer<W: Write> {
    out: W,
    canvas: Option<Canvas>,
    dirty: bool,
    error: Option<io::Error>,
}

impl<W: Write> TerminalRenderer<W> {
    const CLEAR_SCREEN: &'static str = "\x1B[2J\x1B[1;1H";

    pub fn new(out: W) -> Self {
        Self {
            out,
            canvas: None,
            dirty: false,
            error: None,
        }
    }

    /// Hand back the writer, or the first write error encountered
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, frame: &Frame<'_>) {
        let grid = frame.grid();
        if !self.canvas.as_ref().is_some_and(|c| c.fits(grid)) {
            self.canvas = Some(Canvas::new(grid.width(), grid.height()));
        }
        if let Some(canvas) = &mut self.canvas {
            canvas.paint_frame(frame);
            self.dirty = true;
        }
    }

    fn present(&mut self) {
        if !self.dirty || self.error.is_some() {
            return;
        }
        let Some(canvas) = &self.canvas else {
            return;
        };
        let result = writeln!(self.out, "{}{}", Self::CLEAR_SCREEN, canvas)
            .and_then(|_| self.out.flush());
        if let Err(err) = result {
            self.error = Some(err);
        }
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{render_text, Frame, Region, Renderer, TerminalRenderer};
    use crate::animation::TickOutcome;
    use crate::config::StepsPerTick;
    use crate::grid::{Grid, Point};
    use crate::maze_generator::Generator;

    #[test]
    fn fresh_grid_is_all_walls() {
        let grid = Grid::new(2, 2).unwrap();
        assert_eq!(
            render_text(&grid, Some(Point::new(1, 0))),
            "+--+--+\n|##|@@|\n+--+--+\n|##|##|\n+--+--+"
        );
    }

    #[test]
    fn open_passages_are_drawn_open() {
        let mut gen = Generator::new(3, 1, Some(0)).unwrap();
        gen.run_to_completion();
        assert_eq!(
            render_text(gen.grid(), gen.cursor()),
            "+--+--+--+\n|        |\n+--+--+--+"
        );
    }

    #[test]
    fn region_around_cursor_is_clipped_to_three_by_three() {
        let grid = Grid::new(5, 5).unwrap();
        let frame = Frame::new(&grid, Some(Point::new(0, 0)), Region::Around(Point::new(0, 0)));
        assert_eq!(frame.cells().count(), 4);

        let frame = Frame::new(&grid, None, Region::Around(Point::new(2, 2)));
        assert_eq!(frame.cells().count(), 9);
        assert!(!frame.in_region(Point::new(4, 2)));
        assert_eq!(frame.visited_cells().count(), 0);

        assert_eq!(Frame::full(&grid, None).cells().count(), 25);
    }

    #[test]
    fn neighborhood_walks_only_its_window() {
        let grid = Grid::new(2000, 2000).unwrap();
        let frame = Frame::new(&grid, None, Region::Around(Point::new(1000, 7)));
        let points: Vec<Point> = frame.cells().map(|(p, _)| p).collect();
        assert_eq!(points.len(), 9);
        assert_eq!(points.first(), Some(&Point::new(999, 6)));
        assert_eq!(points.last(), Some(&Point::new(1001, 8)));
        assert!(points.iter().all(|&p| frame.in_region(p)));

        let frame = Frame::new(&grid, None, Region::Around(Point::new(1999, 1999)));
        let points: Vec<Point> = frame.cells().map(|(p, _)| p).collect();
        assert_eq!(
            points,
            vec![
                Point::new(1998, 1998),
                Point::new(1999, 1998),
                Point::new(1998, 1999),
                Point::new(1999, 1999),
            ]
        );

        // Repeated windows stay cheap on a large grid
        let frame = Frame::new(&grid, None, Region::Around(Point::new(5, 5)));
        let total: usize = (0..10_000).map(|_| frame.cells().count()).sum();
        assert_eq!(total, 90_000);
    }

    #[test]
    fn terminal_output_matches_full_text_after_animation() {
        let mut gen = Generator::new(6, 5, Some(13)).unwrap();
        let mut terminal = TerminalRenderer::new(Vec::new());
        gen.start(true);
        while gen.tick(StepsPerTick::MIN, &mut terminal) == TickOutcome::Scheduled {}

        let out = String::from_utf8(terminal.finish().unwrap()).unwrap();
        let last_screen = out.rsplit("\x1B[2J\x1B[1;1H").next().unwrap();
        assert_eq!(last_screen.trim_end(), render_text(gen.grid(), None));
    }

    #[test]
    fn present_without_draw_writes_nothing() {
        let mut terminal = TerminalRenderer::new(Vec::new());
        terminal.present();
        assert!(terminal.finish().unwrap().is_empty());
    }
}
