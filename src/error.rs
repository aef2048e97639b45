use std::path::PathBuf;

use thiserror::Error;

use crate::cell::Cell;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while loading a grid or running a search on it. A goal that
/// cannot be reached is not an error; see [SearchStatus](crate::SearchStatus).
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed grid: {0}")]
    MalformedGrid(#[from] Malformed),
    #[error("no cost registered for terrain {symbol:?} at {cell}")]
    UnknownTerrain { symbol: char, cell: Cell },
    #[error("{0} lies outside the grid")]
    OutOfBounds(Cell),
    #[error("path cost overflows at {0}")]
    CostOverflow(Cell),
    #[error("predecessor chain from {0} does not lead back to the start")]
    BrokenPredecessorChain(Cell),
    #[error("could not read grid file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural problems found while parsing grid text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("grid text contains no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("no start marker")]
    MissingStart,
    #[error("no goal marker")]
    MissingGoal,
    #[error("second start marker at {second}, first at {first}")]
    DuplicateStart { first: Cell, second: Cell },
    #[error("second goal marker at {second}, first at {first}")]
    DuplicateGoal { first: Cell, second: Cell },
}
