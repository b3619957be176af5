//! Capability sets for the element types stored in patch data arrays.
//!
//! Every operator in this crate is written once against these traits rather
//! than once per element type. `Scalar` covers the arithmetic shared by all
//! element types, `OrderedScalar` adds the comparisons needed by extrema, and
//! `FieldScalar` adds multiplication by a real weight, which the
//! control-volume weighted norms require.

use core::fmt::{Debug, Display};
use core::ops::{Add, Div, Mul, Neg, Sub};
use num_complex::Complex64;
use num_traits::{Bounded, One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::message::reduce::Reducible;
use crate::patch_data::{PatchArray, PatchData};




/// Runtime tag for the element type of a registered variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Int,
    Float,
    Double,
    Complex,
}




/// Arithmetic shared by all element types.
pub trait Scalar:
    Copy
    + Debug
    + Display
    + PartialEq
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Reducible
{
    /// The element type of `abs(x)`: `f64` for complex data, `Self` otherwise.
    type Real: Scalar;

    const ELEMENT: ElementType;

    fn abs(self) -> Self::Real;

    /// The magnitude `|x|` as a double.
    fn magnitude(self) -> f64;

    /// The squared magnitude `x * conj(x)` as a double.
    fn norm_sqr(self) -> f64;

    fn conj(self) -> Self;

    /// A uniformly distributed value in `[low, low + width)`, component-wise
    /// for complex values.
    fn random<R: Rng + ?Sized>(rng: &mut R, width: Self, low: Self) -> Self;

    fn wrap(array: PatchArray<Self>) -> PatchData;

    fn unwrap_ref(data: &PatchData) -> Option<&PatchArray<Self>>;

    fn unwrap_mut(data: &mut PatchData) -> Option<&mut PatchArray<Self>>;
}




/// Element types with a total order and representable extrema.
pub trait OrderedScalar: Scalar + PartialOrd + Bounded {}

/// Element types which can be scaled by a real weight.
pub trait FieldScalar: Scalar {
    fn weight(self, w: f64) -> Self;
}




// ============================================================================
macro_rules! impl_patch_data_conversion {
    ($variant:ident) => {
        fn wrap(array: PatchArray<Self>) -> PatchData {
            PatchData::$variant(array)
        }

        fn unwrap_ref(data: &PatchData) -> Option<&PatchArray<Self>> {
            match data {
                PatchData::$variant(array) => Some(array),
                _ => None,
            }
        }

        fn unwrap_mut(data: &mut PatchData) -> Option<&mut PatchArray<Self>> {
            match data {
                PatchData::$variant(array) => Some(array),
                _ => None,
            }
        }
    };
}

impl Scalar for i32 {
    type Real = i32;
    const ELEMENT: ElementType = ElementType::Int;

    fn abs(self) -> i32 {
        i32::abs(self)
    }

    fn magnitude(self) -> f64 {
        f64::from(self).abs()
    }

    fn norm_sqr(self) -> f64 {
        f64::from(self) * f64::from(self)
    }

    fn conj(self) -> Self {
        self
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, width: Self, low: Self) -> Self {
        low + (f64::from(width) * rng.gen::<f64>()) as i32
    }

    impl_patch_data_conversion!(Int);
}

impl Scalar for f32 {
    type Real = f32;
    const ELEMENT: ElementType = ElementType::Float;

    fn abs(self) -> f32 {
        f32::abs(self)
    }

    fn magnitude(self) -> f64 {
        f64::from(self).abs()
    }

    fn norm_sqr(self) -> f64 {
        f64::from(self) * f64::from(self)
    }

    fn conj(self) -> Self {
        self
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, width: Self, low: Self) -> Self {
        low + width * rng.gen::<f32>()
    }

    impl_patch_data_conversion!(Float);
}

impl Scalar for f64 {
    type Real = f64;
    const ELEMENT: ElementType = ElementType::Double;

    fn abs(self) -> f64 {
        f64::abs(self)
    }

    fn magnitude(self) -> f64 {
        self.abs()
    }

    fn norm_sqr(self) -> f64 {
        self * self
    }

    fn conj(self) -> Self {
        self
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, width: Self, low: Self) -> Self {
        low + width * rng.gen::<f64>()
    }

    impl_patch_data_conversion!(Double);
}

impl Scalar for Complex64 {
    type Real = f64;
    const ELEMENT: ElementType = ElementType::Complex;

    fn abs(self) -> f64 {
        self.norm()
    }

    fn magnitude(self) -> f64 {
        (self.re * self.re + self.im * self.im).sqrt()
    }

    fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, width: Self, low: Self) -> Self {
        Complex64::new(
            low.re + width.re * rng.gen::<f64>(),
            low.im + width.im * rng.gen::<f64>())
    }

    impl_patch_data_conversion!(Complex);
}

impl OrderedScalar for i32 {}
impl OrderedScalar for f32 {}
impl OrderedScalar for f64 {}

impl FieldScalar for f32 {
    fn weight(self, w: f64) -> Self {
        (f64::from(self) * w) as f32
    }
}

impl FieldScalar for f64 {
    fn weight(self, w: f64) -> Self {
        self * w
    }
}

impl FieldScalar for Complex64 {
    fn weight(self, w: f64) -> Self {
        self * w
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Scalar;
    use num_complex::Complex64;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn complex_magnitude_is_euclidean() {
        let z = Complex64::new(3.0, -4.0);
        assert_eq!(Scalar::abs(z), 5.0);
        assert_eq!(z.norm_sqr(), 25.0);
        assert_eq!(Scalar::conj(z), Complex64::new(3.0, 4.0));
    }

    #[test]
    fn random_values_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..100 {
            let x = f64::random(&mut rng, 2.0, -1.0);
            assert!((-1.0..1.0).contains(&x));
            let n = i32::random(&mut rng, 10, 5);
            assert!((5..15).contains(&n));
        }
    }
}
