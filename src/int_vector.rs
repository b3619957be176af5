use core::fmt;
use core::ops::{Add, Index, IndexMut, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};




/// The largest spatial dimension supported by the index space types.
pub const MAX_DIM: usize = 3;




/**
 * A small integer vector in index space, used for box corners, ghost widths,
 * and refinement ratios. Only the first `dim` entries are meaningful; the
 * remaining slots are kept at zero so that derived equality and hashing
 * behave.
 */
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntVector {
    dim: usize,
    data: [i64; MAX_DIM],
}




// ============================================================================
impl IntVector {

    /**
     * Construct a vector from a slice of components. The slice length is the
     * dimension, which must not exceed `MAX_DIM`.
     */
    pub fn new(components: &[i64]) -> Self {
        assert!(
            components.len() <= MAX_DIM,
            "dimension {} exceeds MAX_DIM = {}", components.len(), MAX_DIM);

        let mut data = [0; MAX_DIM];
        data[..components.len()].copy_from_slice(components);
        Self { dim: components.len(), data }
    }


    /**
     * Return a vector of the given dimension with every component set to
     * `value`.
     */
    pub fn uniform(dim: usize, value: i64) -> Self {
        assert!(dim <= MAX_DIM, "dimension {} exceeds MAX_DIM = {}", dim, MAX_DIM);

        let mut data = [0; MAX_DIM];
        data[..dim].iter_mut().for_each(|x| *x = value);
        Self { dim, data }
    }

    pub fn zero(dim: usize) -> Self {
        Self::uniform(dim, 0)
    }

    pub fn one(dim: usize) -> Self {
        Self::uniform(dim, 1)
    }

    /// A vector which is zero everywhere except `value` on `axis`.
    pub fn unit(dim: usize, axis: usize, value: i64) -> Self {
        let mut v = Self::zero(dim);
        v[axis] = value;
        v
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.data[..self.dim]
    }

    /// The product of the components; this is the volume of a box with this
    /// shape.
    pub fn product(&self) -> i64 {
        self.as_slice().iter().product()
    }

    pub fn min_component(&self) -> i64 {
        self.as_slice().iter().copied().min().unwrap_or(0)
    }

    pub fn max_component(&self) -> i64 {
        self.as_slice().iter().copied().max().unwrap_or(0)
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Self) -> Self {
        self.zip_with(other, i64::min)
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Self) -> Self {
        self.zip_with(other, i64::max)
    }

    /**
     * Component-wise division rounding toward negative infinity. This is the
     * coarsening rule for cell indexes: index -1 at ratio 2 maps to coarse
     * index -1, not 0.
     */
    pub fn floor_div(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a.div_euclid(b))
    }

    fn zip_with<F: Fn(i64, i64) -> i64>(&self, other: &Self, f: F) -> Self {
        assert_eq!(self.dim, other.dim, "dimension mismatch in IntVector operation");

        let mut data = [0; MAX_DIM];

        for (i, x) in data.iter_mut().take(self.dim).enumerate() {
            *x = f(self.data[i], other.data[i])
        }
        Self { dim: self.dim, data }
    }
}




// ============================================================================
impl Add for IntVector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        self.zip_with(&other, |a, b| a + b)
    }
}

impl Sub for IntVector {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.zip_with(&other, |a, b| a - b)
    }
}

impl Mul for IntVector {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        self.zip_with(&other, |a, b| a * b)
    }
}

impl Mul<i64> for IntVector {
    type Output = Self;

    fn mul(self, other: i64) -> Self::Output {
        let mut data = self.data;

        for x in data.iter_mut().take(self.dim) {
            *x *= other
        }
        Self { dim: self.dim, data }
    }
}

impl Neg for IntVector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * -1
    }
}




// ============================================================================
impl Index<usize> for IntVector {
    type Output = i64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for IntVector {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[..self.dim][index]
    }
}

impl fmt::Debug for IntVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_slice())
    }
}

impl fmt::Display for IntVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, ")")
    }
}

impl From<&[i64]> for IntVector {
    fn from(components: &[i64]) -> Self {
        Self::new(components)
    }
}

impl<const DIM: usize> From<[i64; DIM]> for IntVector {
    fn from(components: [i64; DIM]) -> Self {
        Self::new(&components)
    }
}
