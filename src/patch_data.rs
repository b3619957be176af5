use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use crate::array_data::ArrayData;
use crate::geometry::{Centering, Geometry};
use crate::index_space::IndexSpace;
use crate::int_vector::IntVector;
use crate::scalar::{ElementType, Scalar};




/**
 * The data of one variable on one patch: a dense array per geometry
 * component, each covering the patch box plus a halo of ghost cells, mapped
 * to that component's geometry. Cell and node data have one component; face
 * and edge data have one component per axis.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchArray<T> {
    centering: Centering,
    cell_box: IndexSpace,
    ghost: IntVector,
    components: Vec<ArrayData<T>>,
}




// ============================================================================
impl<T: Scalar> PatchArray<T> {

    /**
     * Allocate zero-initialized data of the given centering over the cell
     * box, with `ghost` layers of ghost cells on every side.
     */
    pub fn new(centering: Centering, cell_box: IndexSpace, ghost: IntVector, depth: usize) -> Self {
        let ghost_box = cell_box.grow(&ghost);
        let components = centering
            .geometries(cell_box.dim())
            .map(|g| ArrayData::new(g.to_geometry_box(&ghost_box), depth, T::zero()))
            .collect();

        Self { centering, cell_box, ghost, components }
    }

    pub fn centering(&self) -> Centering {
        self.centering
    }

    /// The patch interior, in cell indexes.
    pub fn cell_box(&self) -> &IndexSpace {
        &self.cell_box
    }

    /// The patch interior grown by the ghost width, in cell indexes.
    pub fn ghost_box(&self) -> IndexSpace {
        self.cell_box.grow(&self.ghost)
    }

    pub fn ghost_width(&self) -> IntVector {
        self.ghost
    }

    pub fn depth(&self) -> usize {
        self.components[0].depth()
    }

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    pub fn geometry(&self, component: usize) -> Geometry {
        self.centering.geometry(component)
    }

    pub fn component(&self, component: usize) -> &ArrayData<T> {
        &self.components[component]
    }

    pub fn component_mut(&mut self, component: usize) -> &mut ArrayData<T> {
        &mut self.components[component]
    }

    pub fn components(&self) -> impl Iterator<Item = (Geometry, &ArrayData<T>)> {
        let centering = self.centering;
        self.components.iter().enumerate().map(move |(c, a)| (centering.geometry(c), a))
    }

    pub fn components_mut(&mut self) -> impl Iterator<Item = (Geometry, &mut ArrayData<T>)> {
        let centering = self.centering;
        self.components.iter_mut().enumerate().map(move |(c, a)| (centering.geometry(c), a))
    }

    /**
     * Determine whether two arrays have the same centering, boxes, depth, and
     * ghost width, so their contents can be exchanged.
     */
    pub fn same_layout(&self, other: &Self) -> bool {
        self.centering == other.centering
            && self.cell_box == other.cell_box
            && self.ghost == other.ghost
            && self.depth() == other.depth()
    }

    /**
     * Exchange the contents of two arrays with the same layout.
     */
    pub fn swap(&mut self, other: &mut Self) {
        assert!(self.same_layout(other), "cannot swap patch arrays with different layouts");

        for (a, b) in self.components.iter_mut().zip(other.components.iter_mut()) {
            a.swap(b)
        }
    }
}




/**
 * Type-erased patch data, one variant per supported element type. Typed
 * access goes through `Scalar::unwrap_ref` and `Scalar::unwrap_mut`.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PatchData {
    Int(PatchArray<i32>),
    Float(PatchArray<f32>),
    Double(PatchArray<f64>),
    Complex(PatchArray<Complex64>),
}




// ============================================================================
impl PatchData {

    /**
     * Allocate zero-initialized data of the given element type.
     */
    pub fn allocate(
        element: ElementType,
        centering: Centering,
        cell_box: IndexSpace,
        ghost: IntVector,
        depth: usize) -> Self
    {
        match element {
            ElementType::Int => PatchData::Int(PatchArray::new(centering, cell_box, ghost, depth)),
            ElementType::Float => PatchData::Float(PatchArray::new(centering, cell_box, ghost, depth)),
            ElementType::Double => PatchData::Double(PatchArray::new(centering, cell_box, ghost, depth)),
            ElementType::Complex => PatchData::Complex(PatchArray::new(centering, cell_box, ghost, depth)),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            PatchData::Int(_) => ElementType::Int,
            PatchData::Float(_) => ElementType::Float,
            PatchData::Double(_) => ElementType::Double,
            PatchData::Complex(_) => ElementType::Complex,
        }
    }

    pub fn centering(&self) -> Centering {
        match self {
            PatchData::Int(a) => a.centering(),
            PatchData::Float(a) => a.centering(),
            PatchData::Double(a) => a.centering(),
            PatchData::Complex(a) => a.centering(),
        }
    }

    pub fn ghost_box(&self) -> IndexSpace {
        match self {
            PatchData::Int(a) => a.ghost_box(),
            PatchData::Float(a) => a.ghost_box(),
            PatchData::Double(a) => a.ghost_box(),
            PatchData::Complex(a) => a.ghost_box(),
        }
    }
}
