use core::fmt;
use serde::{Deserialize, Serialize};
use crate::index_space::IndexSpace;




/**
 * Where data lives relative to a cell: at its center, on its faces, along its
 * edges, or at its nodes.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Centering {
    Cell,
    Face,
    Edge,
    Node,
}




/**
 * The index layout of one component array. Face and edge data carry one
 * component per axis: `Face(a)` holds the faces normal to axis `a` and
 * `Edge(a)` holds the edges parallel to axis `a`.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Geometry {
    Cell,
    Face(usize),
    Edge(usize),
    Node,
}




// ============================================================================
impl Centering {

    /// Return the number of component arrays used by data of this centering
    /// in the given dimension.
    pub fn num_components(&self, dim: usize) -> usize {
        match self {
            Centering::Cell | Centering::Node => 1,
            Centering::Face | Centering::Edge => dim,
        }
    }

    /// Return the geometry of the given component.
    pub fn geometry(&self, component: usize) -> Geometry {
        match self {
            Centering::Cell => Geometry::Cell,
            Centering::Node => Geometry::Node,
            Centering::Face => Geometry::Face(component),
            Centering::Edge => Geometry::Edge(component),
        }
    }

    /// Iterate over the geometries of all components in the given dimension.
    pub fn geometries(self, dim: usize) -> impl Iterator<Item = Geometry> {
        (0..self.num_components(dim)).map(move |c| self.geometry(c))
    }
}

impl fmt::Display for Centering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Centering::Cell => "cell",
            Centering::Face => "face",
            Centering::Edge => "edge",
            Centering::Node => "node",
        };
        write!(f, "{}", name)
    }
}




// ============================================================================
impl Geometry {

    /**
     * Map a cell-indexed box to the box of entities of this geometry which
     * bound those cells:
     *
     * - cell: unchanged
     * - node: one extra layer on the upper side of every axis
     * - face normal to `a`: one extra layer on the upper side of axis `a`
     * - edge parallel to `a`: one extra layer on the upper side of every axis
     *   except `a`
     *
     * Empty boxes stay empty.
     */
    pub fn to_geometry_box(&self, cell_box: &IndexSpace) -> IndexSpace {
        self.shift_upper(cell_box, 1)
    }

    /**
     * Inverse of `to_geometry_box`: recover the cell box from a box of this
     * geometry.
     */
    pub fn to_cell_box(&self, geometry_box: &IndexSpace) -> IndexSpace {
        self.shift_upper(geometry_box, -1)
    }

    fn shift_upper(&self, space: &IndexSpace, delta: i64) -> IndexSpace {
        if space.is_empty() {
            return *space;
        }
        let dim = space.dim();

        match *self {
            Geometry::Cell => *space,
            Geometry::Node => (0..dim).fold(*space, |b, d| b.grow_upper(d, delta)),
            Geometry::Face(axis) => {
                assert!(axis < dim, "face axis {} out of range for dimension {}", axis, dim);
                space.grow_upper(axis, delta)
            }
            Geometry::Edge(axis) => {
                assert!(axis < dim, "edge axis {} out of range for dimension {}", axis, dim);
                (0..dim).filter(|&d| d != axis).fold(*space, |b, d| b.grow_upper(d, delta))
            }
        }
    }
}




/**
 * Compile-time tag for a centering, used to select the hierarchy-wide
 * operators for one kind of data.
 */
pub trait CenteringKind {
    const CENTERING: Centering;
}

/// Cell-centered data.
pub struct CellCentered;

/// Face-centered data (one component per face normal).
pub struct FaceCentered;

/// Edge-centered data (one component per edge direction).
pub struct EdgeCentered;

/// Node-centered data.
pub struct NodeCentered;

impl CenteringKind for CellCentered {
    const CENTERING: Centering = Centering::Cell;
}

impl CenteringKind for FaceCentered {
    const CENTERING: Centering = Centering::Face;
}

impl CenteringKind for EdgeCentered {
    const CENTERING: Centering = Centering::Edge;
}

impl CenteringKind for NodeCentered {
    const CENTERING: Centering = Centering::Node;
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{Centering, Geometry};
    use crate::index_space::{range2d, range3d, IndexSpace};

    #[test]
    fn geometry_boxes_follow_the_layout_conventions() {
        let b = range3d(0..2, 0..3, 0..4);
        assert_eq!(Geometry::Cell.to_geometry_box(&b).len(), 24);
        assert_eq!(Geometry::Node.to_geometry_box(&b).len(), 3 * 4 * 5);
        assert_eq!(Geometry::Face(0).to_geometry_box(&b).len(), 3 * 3 * 4);
        assert_eq!(Geometry::Face(2).to_geometry_box(&b).len(), 2 * 3 * 5);
        assert_eq!(Geometry::Edge(0).to_geometry_box(&b).len(), 2 * 4 * 5);
        assert_eq!(Geometry::Edge(1).to_geometry_box(&b).len(), 3 * 3 * 5);
    }

    #[test]
    fn geometry_box_round_trips_to_cell_box() {
        let b = range2d(-3..5, 2..4);
        for centering in [Centering::Cell, Centering::Face, Centering::Edge, Centering::Node] {
            for g in centering.geometries(2) {
                assert_eq!(g.to_cell_box(&g.to_geometry_box(&b)), b);
            }
        }
    }

    #[test]
    fn empty_boxes_stay_empty() {
        let e = IndexSpace::empty(2);
        assert!(Geometry::Node.to_geometry_box(&e).is_empty());
        assert!(Geometry::Face(1).to_geometry_box(&e).is_empty());
    }

    #[test]
    fn face_and_edge_data_have_one_component_per_axis() {
        assert_eq!(Centering::Face.geometries(3).count(), 3);
        assert_eq!(Centering::Edge.geometries(2).collect::<Vec<_>>(), vec![Geometry::Edge(0), Geometry::Edge(1)]);
        assert_eq!(Centering::Node.geometries(3).count(), 1);
    }
}
