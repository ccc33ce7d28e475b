//! Errors raised while building and driving a maze

use std::fmt;

/// Error type for grid construction and generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// Grid width or height is zero
    InvalidDimension { width: usize, height: usize },
    /// A position outside of the grid was addressed, or a passage was
    /// opened through the outer boundary from the given position
    ///
    /// The generator only ever addresses in-bounds cells, so seeing this
    /// from a step means the walk itself is broken.
    OutOfBounds { x: usize, y: usize },
    /// Steps-per-tick input that is not a positive integer
    InvalidRate(String),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MazeError::InvalidDimension { width, height } => {
                write!(
                    f,
                    "invalid maze dimensions {}x{}: width and height must be at least 1",
                    width, height
                )
            }
            MazeError::OutOfBounds { x, y } => {
                write!(f, "out of bounds access at x={}, y={}", x, y)
            }
            MazeError::InvalidRate(input) => {
                write!(
                    f,
                    "invalid steps per tick `{}`: expected a positive integer",
                    input
                )
            }
        }
    }
}

impl std::error::Error for MazeError {}

#[cfg(test)]
mod tests {
    use super::MazeError;

    #[test]
    fn messages_name_the_offending_values() {
        let err = MazeError::InvalidDimension {
            width: 0,
            height: 7,
        };
        assert!(err.to_string().contains("0x7"));

        let err = MazeError::OutOfBounds { x: 40, y: 3 };
        assert!(err.to_string().contains("x=40, y=3"));

        let err = MazeError::InvalidRate("fast".into());
        assert!(err.to_string().contains("`fast`"));
    }
}
