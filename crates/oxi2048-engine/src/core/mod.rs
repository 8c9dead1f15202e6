pub use self::{direction::*, tile_grid::*};

pub(crate) mod direction;
pub(crate) mod tile_grid;
