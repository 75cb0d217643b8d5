use thiserror::Error;

/// Errors building a world or reading a world file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("a world must be at least 1x1, got {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("cell ({x}, {y}) is outside the {width}x{height} world")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("world file has no 'Dimension' line")]
    MissingDimension,

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}
