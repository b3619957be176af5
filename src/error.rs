use thiserror::Error;
use crate::index_space::IndexSpace;
use crate::int_vector::IntVector;




/**
 * Error to represent an invalid patch hierarchy, an invalid variable
 * registration, or an invalid level range for the hierarchy-wide operators.
 */
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("dimension {0} is not supported (must be 1..={max})", max = crate::int_vector::MAX_DIM)]
    UnsupportedDimension(usize),

    #[error("expected dimension {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("variable `{0}` is already registered")]
    DuplicateVariable(String),

    #[error("variable `{0}` must have a depth of at least one")]
    ZeroDepth(String),

    #[error("variable `{0}` has a negative ghost width")]
    NegativeGhostWidth(String),

    #[error("level {level}: patch box {space} is empty")]
    EmptyPatch { level: usize, space: IndexSpace },

    #[error("level {level}: patch boxes {first} and {second} overlap")]
    OverlappingPatches { level: usize, first: IndexSpace, second: IndexSpace },

    #[error("level {level}: {boxes} boxes but {owners} owners")]
    OwnerCountMismatch { level: usize, boxes: usize, owners: usize },

    #[error("level {level}: owner rank {owner} is out of range for {num_ranks} ranks")]
    OwnerOutOfRange { level: usize, owner: usize, num_ranks: usize },

    #[error("level {level}: invalid refinement ratio {ratio}")]
    InvalidRatio { level: usize, ratio: IntVector },

    #[error("level {level}: patch box {space} is not nested in the next coarser level")]
    ImproperNesting { level: usize, space: IndexSpace },

    #[error("level {0} does not exist")]
    NoSuchLevel(usize),

    #[error("invalid level range [{coarsest}, {finest}] for a hierarchy whose finest level is {finest_in_hierarchy:?}")]
    InvalidLevelRange { coarsest: usize, finest: usize, finest_in_hierarchy: Option<usize> },

    #[error("level {level} was regridded; reset the level range first")]
    StaleDecomposition { level: usize },

    #[error("rank {rank} is out of range for {num_ranks} ranks")]
    InvalidRank { rank: usize, num_ranks: usize },
}
