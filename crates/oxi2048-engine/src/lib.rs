pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A board snapshot could not be constructed from the given shape.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BoardShapeError {
    #[display("board dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },
    #[display("tile at ({x}, {y}) does not fit a {width}x{height} board")]
    TileOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[display("all rows must have {expected} cells, found a row with {found}")]
    RaggedRows { expected: usize, found: usize },
}
