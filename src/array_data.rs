use serde::{Deserialize, Serialize};
use crate::index_space::IndexSpace;
use crate::int_vector::IntVector;
use crate::scalar::Scalar;




/**
 * A dense array of values over a rectangular index space, with `depth`
 * values per index. The values for one index are stored contiguously, and
 * indexes are laid out in the row-major order of `IndexSpace::offset`.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrayData<T> {
    space: IndexSpace,
    depth: usize,
    data: Vec<T>,
}




// ============================================================================
impl<T: Scalar> ArrayData<T> {

    /**
     * Generate an array covering the given index space with every value set
     * to `fill`.
     */
    pub fn new(space: IndexSpace, depth: usize, fill: T) -> Self {
        assert!(depth > 0, "array depth must be at least one");
        Self { space, depth, data: vec![fill; space.len() * depth] }
    }


    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }


    /**
     * Return the values at the given index, one per depth component.
     */
    pub fn get_slice(&self, index: &IntVector) -> &[T] {
        self.validate_index(index);
        let n = self.space.offset(index) * self.depth;
        &self.data[n..n + self.depth]
    }

    pub fn get(&self, index: &IntVector, component: usize) -> T {
        self.get_slice(index)[component]
    }

    /**
     * Exchange the contents of two arrays with the same layout.
     */
    pub fn swap(&mut self, other: &mut Self) {
        assert_eq!(self.space, other.space, "cannot swap arrays over different index spaces");
        assert_eq!(self.depth, other.depth, "cannot swap arrays of different depth");
        std::mem::swap(&mut self.data, &mut other.data)
    }

    fn validate_index(&self, index: &IntVector) {
        if !self.space.contains(index) {
            panic!("index {} out of range on array {}", index, self.space)
        }
    }
}
