//! Hiergrid is the data layer of a structured adaptive mesh refinement (AMR)
//! code: a distributed hierarchy of rectilinear patch levels, the typed data
//! arrays living on each patch, and the elementwise arithmetic and global
//! reductions numerical algorithms perform over them.
//!
//! Patches on a level are distributed over a group of processes in SPMD
//! style. Each process holds the full description of every level but
//! allocates data only for the patches it owns. The hierarchy-wide operators
//! in `hierarchy_ops` visit the locally owned patches of a range of levels
//! and combine scalar results with one collective reduction per call, while
//! counting entries shared between adjacent patches (faces, edges and nodes
//! on a common boundary) exactly once.

pub mod array_data;
pub mod box_container;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod hierarchy_ops;
pub mod index_space;
pub mod int_vector;
pub mod level;
pub mod message;
pub mod patch;
pub mod patch_data;
pub mod patch_ops;
pub mod scalar;

pub use descriptor::{DataId, PatchDescriptor};
pub use error::Error;
pub use geometry::Centering;
pub use hierarchy::PatchHierarchy;
pub use hierarchy_ops::{HierarchyCellDataOps, HierarchyDataOps, HierarchyEdgeDataOps, HierarchyFaceDataOps, HierarchyNodeDataOps};
pub use index_space::IndexSpace;
pub use int_vector::IntVector;
