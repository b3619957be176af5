use core::fmt;
use core::ops::Range;
use serde::{Deserialize, Serialize};
use crate::int_vector::IntVector;




/**
 * Represents a rectangular region in a discrete index space of dimension
 * `1..=MAX_DIM`. The lower and upper corners are both inclusive. The index
 * space is empty if any upper coordinate is below the corresponding lower
 * coordinate, or if the dimension is zero. Index spaces are plain values:
 * they are compared and combined, never owned by anything in particular.
 */
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpace {
    lower: IntVector,
    upper: IntVector,
}




// ============================================================================
impl IndexSpace {


    /**
     * Create an index space from its inclusive corners.
     */
    pub fn new(lower: IntVector, upper: IntVector) -> Self {
        assert_eq!(
            lower.dim(), upper.dim(),
            "index space corners have different dimensions");

        Self { lower, upper }
    }


    /**
     * Return an empty index space of the given dimension.
     */
    pub fn empty(dim: usize) -> Self {
        Self::new(IntVector::zero(dim), IntVector::uniform(dim, -1))
    }


    pub fn dim(&self) -> usize {
        self.lower.dim()
    }


    /**
     * Return the minimum index (inclusive).
     */
    pub fn lower(&self) -> IntVector {
        self.lower
    }


    /**
     * Return the maximum index (inclusive).
     */
    pub fn upper(&self) -> IntVector {
        self.upper
    }


    pub fn is_empty(&self) -> bool {
        self.dim() == 0 || (0..self.dim()).any(|d| self.upper[d] < self.lower[d])
    }


    /**
     * Return the number of indexes on each axis. All zeros if the index space
     * is empty.
     */
    pub fn shape(&self) -> IntVector {
        if self.is_empty() {
            IntVector::zero(self.dim())
        } else {
            self.upper - self.lower + IntVector::one(self.dim())
        }
    }


    /**
     * Return the number of elements in this index space.
     */
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.shape().product() as usize
        }
    }


    /**
     * Determine whether this index space contains the given index.
     */
    pub fn contains(&self, index: &IntVector) -> bool {
        assert_eq!(index.dim(), self.dim());
        (0..self.dim()).all(|d| self.lower[d] <= index[d] && index[d] <= self.upper[d])
    }


    /**
     * Determine whether another index space is a subset of this one. The
     * empty index space is a subset of everything.
     */
    pub fn contains_space(&self, other: &Self) -> bool {
        other.is_empty() || (!self.is_empty() &&
            (0..self.dim()).all(|d| self.lower[d] <= other.lower[d] && other.upper[d] <= self.upper[d]))
    }


    /**
     * Return the intersection of two index spaces, which may be empty.
     */
    pub fn intersect(&self, other: &Self) -> Self {
        assert_eq!(self.dim(), other.dim(), "intersecting index spaces of different dimension");
        Self::new(self.lower.max(&other.lower), self.upper.min(&other.upper))
    }


    pub fn intersects(&self, other: &Self) -> bool {
        !self.intersect(other).is_empty()
    }


    /**
     * Expand this index space by the given number of elements on each side
     * of each axis. A negative width trims.
     */
    pub fn grow(&self, width: &IntVector) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::new(self.lower - *width, self.upper + *width)
    }


    /**
     * Expand this index space by the given number of elements on all axes.
     */
    pub fn extend_all(&self, delta: i64) -> Self {
        self.grow(&IntVector::uniform(self.dim(), delta))
    }


    /**
     * Trim this index space by the given number of elements on all axes.
     */
    pub fn trim_all(&self, delta: i64) -> Self {
        self.extend_all(-delta)
    }


    /**
     * Move the upper corner by `delta` on the given axis.
     */
    pub fn grow_upper(&self, axis: usize, delta: i64) -> Self {
        let mut upper = self.upper;
        upper[axis] += delta;
        Self::new(self.lower, upper)
    }


    /**
     * Translate this index space by the given offset.
     */
    pub fn shift(&self, offset: &IntVector) -> Self {
        Self::new(self.lower + *offset, self.upper + *offset)
    }


    /**
     * Map a cell index space to the next finer level, given the refinement
     * ratio on each axis.
     */
    pub fn refine(&self, ratio: &IntVector) -> Self {
        if self.is_empty() {
            return *self;
        }
        let one = IntVector::one(self.dim());
        Self::new(self.lower * *ratio, (self.upper + one) * *ratio - one)
    }


    /**
     * Map a cell index space to the next coarser level. The result is the
     * smallest coarse index space covering this one.
     */
    pub fn coarsen(&self, ratio: &IntVector) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::new(self.lower.floor_div(ratio), self.upper.floor_div(ratio))
    }


    /**
     * Return the linear offset for the given index, in a row-major memory
     * buffer aligned with the start of this index space (the final axis
     * increases fastest).
     */
    pub fn offset(&self, index: &IntVector) -> usize {
        let shape = self.shape();
        let mut n = 0;

        for d in 0..self.dim() {
            n = n * shape[d] + (index[d] - self.lower[d])
        }
        n as usize
    }


    /**
     * Return the parts of this index space which are not covered by `other`,
     * as a list of pairwise disjoint index spaces. The slabs are cut off one
     * axis at a time, lower side before upper side.
     */
    pub fn remove(&self, other: &Self) -> Vec<Self> {
        let overlap = self.intersect(other);

        if overlap.is_empty() {
            return if self.is_empty() { vec![] } else { vec![*self] };
        }
        let mut pieces = Vec::new();
        let mut rest = *self;

        for d in 0..self.dim() {
            if rest.lower[d] < overlap.lower[d] {
                let mut upper = rest.upper;
                upper[d] = overlap.lower[d] - 1;
                pieces.push(Self::new(rest.lower, upper));
                rest.lower[d] = overlap.lower[d];
            }
            if rest.upper[d] > overlap.upper[d] {
                let mut lower = rest.lower;
                lower[d] = overlap.upper[d] + 1;
                pieces.push(Self::new(lower, rest.upper));
                rest.upper[d] = overlap.upper[d];
            }
        }
        pieces
    }


    /**
     * Return an iterator which traverses the index space in row-major order
     * (C-like; the final index increases fastest).
     */
    pub fn iter(&self) -> IndexIter {
        IndexIter {
            space: *self,
            next: if self.is_empty() { None } else { Some(self.lower) },
        }
    }
}




// ============================================================================
impl fmt::Debug for IndexSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.lower, self.upper)
    }
}

impl fmt::Display for IndexSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<'a> IntoIterator for &'a IndexSpace {
    type Item = IntVector;
    type IntoIter = IndexIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}




/**
 * Row-major iterator over the indexes of an `IndexSpace`.
 */
pub struct IndexIter {
    space: IndexSpace,
    next: Option<IntVector>,
}

impl Iterator for IndexIter {
    type Item = IntVector;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let mut index = current;
        let lower = self.space.lower;
        let upper = self.space.upper;

        self.next = None;

        for d in (0..self.space.dim()).rev() {
            if index[d] < upper[d] {
                index[d] += 1;
                self.next = Some(index);
                break;
            }
            index[d] = lower[d];
        }
        Some(current)
    }
}




/**
 * Less imposing factory function to construct a 2D IndexSpace from half-open
 * ranges.
 */
pub fn range2d(di: Range<i64>, dj: Range<i64>) -> IndexSpace {
    IndexSpace::new(
        IntVector::from([di.start, dj.start]),
        IntVector::from([di.end - 1, dj.end - 1]))
}


/**
 * Less imposing factory function to construct a 3D IndexSpace from half-open
 * ranges.
 */
pub fn range3d(di: Range<i64>, dj: Range<i64>, dk: Range<i64>) -> IndexSpace {
    IndexSpace::new(
        IntVector::from([di.start, dj.start, dk.start]),
        IntVector::from([di.end - 1, dj.end - 1, dk.end - 1]))
}
