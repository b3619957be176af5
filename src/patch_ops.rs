//! Single-patch operators.
//!
//! Every operator acts on the data arrays of one patch over a cell-indexed
//! region. Each component of the data works on the region mapped to its own
//! geometry, intersected with the index spaces of all the arrays involved, so
//! indexes outside an array are never touched. The operators do not
//! allocate and do not communicate.
//!
//! Reductions optionally take a control volume array of the same centering.
//! Its entries weight the corresponding data entries; a control volume of
//! depth one weights every depth component of the data alike. Without a
//! control volume every entry has weight one.
//!
//! Integer data follows the native integer operators: division by zero
//! panics, and overflow panics in debug builds and wraps in release builds.

use std::io::{self, Write};
use rand::Rng;
use crate::array_data::ArrayData;
use crate::index_space::IndexSpace;
use crate::int_vector::IntVector;
use crate::patch_data::PatchArray;
use crate::scalar::{FieldScalar, OrderedScalar, Scalar};




type Layout = (IndexSpace, usize);

fn layout<T: Scalar>(array: &ArrayData<T>) -> Layout {
    (*array.index_space(), array.depth())
}

/**
 * Iterate over the rows of a region along its final axis, yielding the first
 * index of each row and the row length.
 */
fn rows(region: &IndexSpace) -> impl Iterator<Item = (IntVector, usize)> {
    let (heads, len) = if region.is_empty() {
        (*region, 0)
    } else {
        let last = region.dim() - 1;
        let mut upper = region.upper();
        upper[last] = region.lower()[last];
        (IndexSpace::new(region.lower(), upper), region.shape()[last] as usize)
    };
    heads.iter().map(move |i| (i, len))
}

/**
 * Call `f` with the buffer offsets of each entry of the region, in each of
 * the given array layouts. Layouts of depth one are broadcast across the
 * `depth` components.
 */
fn visit<const N: usize, F>(region: &IndexSpace, layouts: [Layout; N], depth: usize, mut f: F)
where
    F: FnMut([usize; N])
{
    let region = layouts.iter().fold(*region, |r, (space, _)| r.intersect(space));

    for (start, len) in rows(&region) {
        let base = layouts.map(|(space, d)| space.offset(&start) * d);

        for j in 0..len {
            for k in 0..depth {
                f(core::array::from_fn(|a| {
                    let d = layouts[a].1;
                    base[a] + j * d + if d == 1 { 0 } else { k }
                }))
            }
        }
    }
}

fn check_conformance<T: Scalar, U: Scalar>(a: &PatchArray<T>, b: &PatchArray<U>) {
    assert_eq!(a.centering(), b.centering(), "patch arrays have different centerings");
    assert_eq!(a.depth(), b.depth(), "patch arrays have different depths");
}

fn check_control_volume<T: Scalar>(data: &PatchArray<T>, cvol: &PatchArray<f64>) {
    assert_eq!(data.centering(), cvol.centering(), "control volume has a different centering than the data");
    assert!(
        cvol.depth() == 1 || cvol.depth() == data.depth(),
        "control volume depth {} does not match data depth {}", cvol.depth(), data.depth());
}




// ============================================================================
fn fill<T, F>(dst: &mut PatchArray<T>, region: &IndexSpace, mut f: F)
where
    T: Scalar,
    F: FnMut() -> T
{
    for c in 0..dst.num_components() {
        let space = dst.geometry(c).to_geometry_box(region);
        let d = dst.component_mut(c);
        let (l, depth) = (layout(d), d.depth());
        let x = d.as_mut_slice();
        visit(&space, [l], depth, |[i]| x[i] = f());
    }
}

fn update<T, U, F>(dst: &mut PatchArray<T>, src: &PatchArray<U>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace, mut f: F)
where
    T: Scalar,
    U: Scalar,
    F: FnMut(&mut T, U, f64)
{
    check_conformance(dst, src);

    if let Some(cv) = cvol {
        check_control_volume(src, cv)
    }
    for c in 0..dst.num_components() {
        let space = dst.geometry(c).to_geometry_box(region);
        let s = src.component(c);
        let d = dst.component_mut(c);
        let (ld, depth) = (layout(d), d.depth());
        let (x, y) = (d.as_mut_slice(), s.as_slice());

        match cvol {
            Some(cv) => {
                let w = cv.component(c);
                let ws = w.as_slice();
                visit(&space, [ld, layout(s), layout(w)], depth, |[i, j, k]| f(&mut x[i], y[j], ws[k]))
            }
            None => visit(&space, [ld, layout(s)], depth, |[i, j]| f(&mut x[i], y[j], 1.0)),
        }
    }
}

fn combine<T, F>(dst: &mut PatchArray<T>, a: &PatchArray<T>, b: &PatchArray<T>, region: &IndexSpace, mut f: F)
where
    T: Scalar,
    F: FnMut(T, T) -> T
{
    check_conformance(dst, a);
    check_conformance(dst, b);

    for c in 0..dst.num_components() {
        let space = dst.geometry(c).to_geometry_box(region);
        let (sa, sb) = (a.component(c), b.component(c));
        let d = dst.component_mut(c);
        let layouts = [layout(d), layout(sa), layout(sb)];
        let depth = d.depth();
        let (x, y, z) = (d.as_mut_slice(), sa.as_slice(), sb.as_slice());
        visit(&space, layouts, depth, |[i, j, k]| x[i] = f(y[j], z[k]));
    }
}

fn fold<T, A, F>(data: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace, init: A, mut f: F) -> A
where
    T: Scalar,
    A: Copy,
    F: FnMut(A, T, f64) -> A
{
    if let Some(cv) = cvol {
        check_control_volume(data, cv)
    }
    let mut acc = init;

    for c in 0..data.num_components() {
        let space = data.geometry(c).to_geometry_box(region);
        let x = data.component(c);
        let xs = x.as_slice();

        match cvol {
            Some(cv) => {
                let w = cv.component(c);
                let ws = w.as_slice();
                visit(&space, [layout(x), layout(w)], x.depth(), |[i, j]| acc = f(acc, xs[i], ws[j]))
            }
            None => visit(&space, [layout(x)], x.depth(), |[i]| acc = f(acc, xs[i], 1.0)),
        }
    }
    acc
}

fn fold_pair<T, A, F>(a: &PatchArray<T>, b: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace, init: A, mut f: F) -> A
where
    T: Scalar,
    A: Copy,
    F: FnMut(A, T, T, f64) -> A
{
    check_conformance(a, b);

    if let Some(cv) = cvol {
        check_control_volume(a, cv)
    }
    let mut acc = init;

    for c in 0..a.num_components() {
        let space = a.geometry(c).to_geometry_box(region);
        let (x, y) = (a.component(c), b.component(c));
        let (xs, ys) = (x.as_slice(), y.as_slice());

        match cvol {
            Some(cv) => {
                let w = cv.component(c);
                let ws = w.as_slice();
                visit(&space, [layout(x), layout(y), layout(w)], x.depth(), |[i, j, k]| acc = f(acc, xs[i], ys[j], ws[k]))
            }
            None => visit(&space, [layout(x), layout(y)], x.depth(), |[i, j]| acc = f(acc, xs[i], ys[j], 1.0)),
        }
    }
    acc
}




// ============================================================================
pub fn copy<T: Scalar>(dst: &mut PatchArray<T>, src: &PatchArray<T>, region: &IndexSpace) {
    update(dst, src, None, region, |d, x, _| *d = x)
}

pub fn set_to_scalar<T: Scalar>(dst: &mut PatchArray<T>, alpha: T, region: &IndexSpace) {
    fill(dst, region, || alpha)
}

/// `dst = alpha * src`
pub fn scale<T: Scalar>(dst: &mut PatchArray<T>, alpha: T, src: &PatchArray<T>, region: &IndexSpace) {
    update(dst, src, None, region, |d, x, _| *d = alpha * x)
}

/// `dst = src + alpha`
pub fn add_scalar<T: Scalar>(dst: &mut PatchArray<T>, src: &PatchArray<T>, alpha: T, region: &IndexSpace) {
    update(dst, src, None, region, |d, x, _| *d = x + alpha)
}

pub fn add<T: Scalar>(dst: &mut PatchArray<T>, a: &PatchArray<T>, b: &PatchArray<T>, region: &IndexSpace) {
    combine(dst, a, b, region, |x, y| x + y)
}

pub fn subtract<T: Scalar>(dst: &mut PatchArray<T>, a: &PatchArray<T>, b: &PatchArray<T>, region: &IndexSpace) {
    combine(dst, a, b, region, |x, y| x - y)
}

pub fn multiply<T: Scalar>(dst: &mut PatchArray<T>, a: &PatchArray<T>, b: &PatchArray<T>, region: &IndexSpace) {
    combine(dst, a, b, region, |x, y| x * y)
}

/// `dst = a / b`. Division by zero is not guarded: floating point data gets
/// IEEE results and integer data panics.
pub fn divide<T: Scalar>(dst: &mut PatchArray<T>, a: &PatchArray<T>, b: &PatchArray<T>, region: &IndexSpace) {
    combine(dst, a, b, region, |x, y| x / y)
}

/// `dst = 1 / src`, unguarded like `divide`.
pub fn reciprocal<T: Scalar>(dst: &mut PatchArray<T>, src: &PatchArray<T>, region: &IndexSpace) {
    update(dst, src, None, region, |d, x, _| *d = T::one() / x)
}

/// `dst = alpha * a + beta * b`
pub fn linear_sum<T: Scalar>(dst: &mut PatchArray<T>, alpha: T, a: &PatchArray<T>, beta: T, b: &PatchArray<T>, region: &IndexSpace) {
    combine(dst, a, b, region, |x, y| alpha * x + beta * y)
}

/// `dst = alpha * a + b`
pub fn axpy<T: Scalar>(dst: &mut PatchArray<T>, alpha: T, a: &PatchArray<T>, b: &PatchArray<T>, region: &IndexSpace) {
    combine(dst, a, b, region, |x, y| alpha * x + y)
}

/// `dst = alpha * a - b`
pub fn axmy<T: Scalar>(dst: &mut PatchArray<T>, alpha: T, a: &PatchArray<T>, b: &PatchArray<T>, region: &IndexSpace) {
    combine(dst, a, b, region, |x, y| alpha * x - y)
}

/// `dst = |src|`, the Euclidean magnitude for complex data.
pub fn abs<T: Scalar>(dst: &mut PatchArray<T::Real>, src: &PatchArray<T>, region: &IndexSpace) {
    update(dst, src, None, region, |d, x, _| *d = x.abs())
}

/**
 * Fill the region with values drawn uniformly from `[low, low + width)`.
 */
pub fn set_random_values<T, R>(dst: &mut PatchArray<T>, width: T, low: T, region: &IndexSpace, rng: &mut R)
where
    T: Scalar,
    R: Rng + ?Sized
{
    fill(dst, region, || T::random(rng, width, low))
}

/**
 * Write every entry in the region, one index per line.
 */
pub fn print_data<T: Scalar, W: Write + ?Sized>(data: &PatchArray<T>, region: &IndexSpace, out: &mut W) -> io::Result<()> {
    for (c, (geometry, array)) in data.components().enumerate() {
        let space = geometry.to_geometry_box(region).intersect(array.index_space());
        writeln!(out, "  component {} ({:?}) over {}", c, geometry, space)?;

        for index in &space {
            write!(out, "    {}", index)?;

            for value in array.get_slice(&index) {
                write!(out, " {}", value)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}




// ============================================================================
/**
 * Return the number of entries (indexes times depth) in the region, summed
 * over all components.
 */
pub fn number_of_entries<T: Scalar>(data: &PatchArray<T>, region: &IndexSpace) -> usize {
    data.components()
        .map(|(geometry, array)| geometry.to_geometry_box(region).intersect(array.index_space()).len() * array.depth())
        .sum()
}

/// Sum of the control volumes of every data entry in the region.
pub fn sum_control_volumes<T: Scalar>(data: &PatchArray<T>, cvol: &PatchArray<f64>, region: &IndexSpace) -> f64 {
    fold(data, Some(cvol), region, 0.0, |acc, _, w| acc + w)
}

/// Smallest value in the region, or the type's maximum if the region is
/// empty.
pub fn min<T: OrderedScalar>(data: &PatchArray<T>, region: &IndexSpace) -> T {
    fold(data, None, region, T::max_value(), |acc, x, _| if x < acc { x } else { acc })
}

/// Largest value in the region, or the negated type maximum if the region is
/// empty.
pub fn max<T: OrderedScalar>(data: &PatchArray<T>, region: &IndexSpace) -> T {
    fold(data, None, region, -T::max_value(), |acc, x, _| if x > acc { x } else { acc })
}

/// `sum |x| cvol`
pub fn l1_norm<T: Scalar>(data: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace) -> f64 {
    fold(data, cvol, region, 0.0, |acc, x, w| acc + x.magnitude() * w)
}

/// `sum x conj(x) cvol`, the square of the L2 norm.
pub fn l2_norm_squared<T: Scalar>(data: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace) -> f64 {
    fold(data, cvol, region, 0.0, |acc, x, w| acc + x.norm_sqr() * w)
}

/// `sum |x wgt|^2 cvol`, the square of the weighted L2 norm.
pub fn weighted_l2_norm_squared<T: Scalar>(
    data: &PatchArray<T>,
    wgt: &PatchArray<T>,
    cvol: Option<&PatchArray<f64>>,
    region: &IndexSpace) -> f64
{
    fold_pair(data, wgt, cvol, region, 0.0, |acc, x, y, w| acc + (x * y).norm_sqr() * w)
}

/// Largest `|x|` over entries with a positive control volume.
pub fn max_norm<T: Scalar>(data: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace) -> f64 {
    fold(data, cvol, region, 0.0, |acc, x, w| if w > 0.0 { acc.max(x.magnitude()) } else { acc })
}

/// `sum a conj(b) cvol`
pub fn dot<T: FieldScalar>(a: &PatchArray<T>, b: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace) -> T {
    fold_pair(a, b, cvol, region, T::zero(), |acc, x, y, w| acc + (x * y.conj()).weight(w))
}

/// `sum x cvol`
pub fn integral<T: FieldScalar>(data: &PatchArray<T>, cvol: &PatchArray<f64>, region: &IndexSpace) -> T {
    fold(data, Some(cvol), region, T::zero(), |acc, x, w| acc + x.weight(w))
}




// ============================================================================
/**
 * Set `dst` to one where `|src| >= alpha` and zero elsewhere. With a control
 * volume, entries whose control volume is not positive are left alone.
 */
pub fn compare_to_scalar<T>(dst: &mut PatchArray<T>, src: &PatchArray<T>, alpha: T, cvol: Option<&PatchArray<f64>>, region: &IndexSpace)
where
    T: OrderedScalar + Scalar<Real = T>
{
    update(dst, src, cvol, region, |d, x, w| {
        if w > 0.0 {
            *d = if x.abs() >= alpha { T::one() } else { T::zero() }
        }
    })
}

/**
 * Set `dst = 1 / src` where `src` is nonzero and zero where it is zero.
 * Returns zero if any zero was found (among entries with a positive control
 * volume) and one otherwise.
 */
pub fn test_reciprocal<T>(dst: &mut PatchArray<T>, src: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace) -> i32
where
    T: OrderedScalar
{
    let mut test = 1;

    update(dst, src, cvol, region, |d, x, w| {
        if w > 0.0 {
            if x == T::zero() {
                test = 0;
                *d = T::zero()
            } else {
                *d = T::one() / x
            }
        }
    });
    test
}

/**
 * Return zero if some entry with a positive control volume has a nonzero
 * constraint `a` and `a * b <= 0`, and one otherwise.
 */
pub fn compute_constr_prod_pos<T>(a: &PatchArray<T>, b: &PatchArray<T>, cvol: Option<&PatchArray<f64>>, region: &IndexSpace) -> i32
where
    T: OrderedScalar
{
    fold_pair(a, b, cvol, region, 1, |test, x, y, w| {
        if w > 0.0 && x != T::zero() && x * y <= T::zero() { 0 } else { test }
    })
}

/**
 * Largest `|numer / denom|` in the region, starting from zero. Entries with
 * a zero denominator contribute `|numer|`.
 */
pub fn max_pointwise_divide<T>(numer: &PatchArray<T>, denom: &PatchArray<T>, region: &IndexSpace) -> T
where
    T: OrderedScalar + Scalar<Real = T>
{
    fold_pair(numer, denom, None, region, T::zero(), |acc, n, d, _| {
        let q = if d == T::zero() { n.abs() } else { (n / d).abs() };
        if q > acc { q } else { acc }
    })
}

/**
 * Smallest `numer / denom` in the region over entries with a nonzero
 * denominator, starting from the type's maximum.
 */
pub fn min_pointwise_divide<T>(numer: &PatchArray<T>, denom: &PatchArray<T>, region: &IndexSpace) -> T
where
    T: OrderedScalar
{
    fold_pair(numer, denom, None, region, T::max_value(), |acc, n, d, _| {
        if d == T::zero() {
            acc
        } else {
            let q = n / d;
            if q < acc { q } else { acc }
        }
    })
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::geometry::Centering;
    use crate::index_space::range2d;
    use num_complex::Complex64;

    fn cell_array<T: Scalar>(value: T) -> PatchArray<T> {
        let mut a = PatchArray::new(Centering::Cell, range2d(0..4, 0..4), IntVector::uniform(2, 1), 1);
        let region = a.ghost_box();
        set_to_scalar(&mut a, value, &region);
        a
    }

    #[test]
    fn interior_operations_leave_ghosts_alone() {
        let mut a = cell_array(1.0);
        let b = cell_array(2.0);
        let interior = *a.cell_box();
        add(&mut a, &b.clone(), &b, &interior);
        assert_eq!(a.component(0).get(&IntVector::from([0, 0]), 0), 4.0);
        assert_eq!(a.component(0).get(&IntVector::from([-1, 0]), 0), 1.0);
        assert_eq!(number_of_entries(&a, &interior), 16);
        assert_eq!(number_of_entries(&a, &a.ghost_box()), 36);
    }

    #[test]
    fn face_entries_count_every_axis() {
        let a: PatchArray<f64> = PatchArray::new(Centering::Face, range2d(0..2, 0..3), IntVector::zero(2), 2);
        assert_eq!(number_of_entries(&a, a.cell_box()), (3 * 3 + 2 * 4) * 2);
    }

    #[test]
    fn region_is_clipped_to_the_array() {
        let mut a: PatchArray<i32> = PatchArray::new(Centering::Node, range2d(0..2, 0..2), IntVector::zero(2), 1);
        set_to_scalar(&mut a, 5, &range2d(-10..10, -10..10));
        assert_eq!(a.component(0).as_slice(), &[5; 9]);
    }

    #[test]
    fn arithmetic_matches_elementwise_definitions() {
        let a = cell_array(3.0);
        let b = cell_array(2.0);
        let mut d = cell_array(0.0);
        let r = *a.cell_box();
        let at = |d: &PatchArray<f64>| d.component(0).get(&IntVector::from([1, 2]), 0);

        linear_sum(&mut d, 2.0, &a, -1.0, &b, &r);
        assert_eq!(at(&d), 4.0);
        axpy(&mut d, 2.0, &a, &b, &r);
        assert_eq!(at(&d), 8.0);
        axmy(&mut d, 2.0, &a, &b, &r);
        assert_eq!(at(&d), 4.0);
        divide(&mut d, &a, &b, &r);
        assert_eq!(at(&d), 1.5);
        reciprocal(&mut d, &b, &r);
        assert_eq!(at(&d), 0.5);
        scale(&mut d, 3.0, &b, &r);
        assert_eq!(at(&d), 6.0);
        add_scalar(&mut d, &b, -7.0, &r);
        assert_eq!(at(&d), -5.0);
    }

    #[test]
    #[should_panic]
    fn integer_division_by_a_zero_field_panics() {
        let a = cell_array(6i32);
        let b = cell_array(0i32);
        let mut d = cell_array(0i32);
        divide(&mut d, &a, &b, a.cell_box());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn integer_overflow_panics_in_debug_builds() {
        let a = cell_array(i32::MAX);
        let b = cell_array(1i32);
        let mut d = cell_array(0i32);
        add(&mut d, &a, &b, a.cell_box());
    }

    #[test]
    fn complex_abs_is_the_magnitude() {
        let z = cell_array(Complex64::new(3.0, 4.0));
        let mut m = cell_array(0.0);
        abs(&mut m, &z, z.cell_box());
        assert_eq!(max(&m, z.cell_box()), 5.0);
        assert_eq!(l2_norm_squared(&z, None, z.cell_box()), 16.0 * 25.0);
        assert_eq!(dot(&z, &z, None, z.cell_box()), Complex64::new(16.0 * 25.0, 0.0));
    }

    #[test]
    fn control_volume_weights_reductions() {
        let x = cell_array(-2.0);
        let mut cv = cell_array(0.0);
        let cb = cv.cell_box().clone();
        set_to_scalar(&mut cv, 0.5, &cb);
        let g = x.ghost_box();

        assert_eq!(sum_control_volumes(&x, &cv, &g), 8.0);
        assert_eq!(l1_norm(&x, Some(&cv), &g), 16.0);
        assert_eq!(integral(&x, &cv, &g), -16.0);
        assert_eq!(max_norm(&x, Some(&cv), &g), 2.0);
        assert_eq!(l1_norm(&x, None, &g), 72.0);
    }

    #[test]
    fn depth_one_control_volume_is_broadcast() {
        let mut x: PatchArray<f64> = PatchArray::new(Centering::Cell, range2d(0..2, 0..2), IntVector::zero(2), 3);
        let mut cv: PatchArray<f64> = PatchArray::new(Centering::Cell, range2d(0..2, 0..2), IntVector::zero(2), 1);
        let r = *x.cell_box();
        set_to_scalar(&mut x, 1.0, &r);
        set_to_scalar(&mut cv, 0.25, &r);
        assert_eq!(sum_control_volumes(&x, &cv, &r), 3.0);
        assert_eq!(integral(&x, &cv, &r), 3.0);
    }

    #[test]
    fn extrema_of_an_empty_region_are_sentinels() {
        let a = cell_array(1i32);
        let empty = IndexSpace::empty(2);
        assert_eq!(min(&a, &empty), i32::MAX);
        assert_eq!(max(&a, &empty), -i32::MAX);
        assert_eq!(number_of_entries(&a, &empty), 0);
    }

    #[test]
    fn real_only_tests() {
        let r = range2d(0..2, 0..1);
        let mut src: PatchArray<f64> = PatchArray::new(Centering::Cell, r, IntVector::zero(2), 1);
        let mut dst = src.clone();
        src.component_mut(0).as_mut_slice().copy_from_slice(&[0.0, 4.0]);

        assert_eq!(test_reciprocal(&mut dst, &src, None, &r), 0);
        assert_eq!(dst.component(0).as_slice(), &[0.0, 0.25]);

        compare_to_scalar(&mut dst, &src, 1.0, None, &r);
        assert_eq!(dst.component(0).as_slice(), &[0.0, 1.0]);

        let mut denom = src.clone();
        denom.component_mut(0).as_mut_slice().copy_from_slice(&[2.0, 0.0]);
        assert_eq!(max_pointwise_divide(&src, &denom, &r), 4.0);
        assert_eq!(min_pointwise_divide(&src, &denom, &r), 0.0);

        let mut b = src.clone();
        b.component_mut(0).as_mut_slice().copy_from_slice(&[-1.0, 1.0]);
        assert_eq!(compute_constr_prod_pos(&src, &b, None, &r), 1);
        assert_eq!(compute_constr_prod_pos(&b, &src, None, &r), 0);
    }

    #[test]
    fn print_writes_each_entry() {
        let a: PatchArray<i32> = PatchArray::new(Centering::Cell, range2d(0..2, 0..1), IntVector::zero(2), 1);
        let mut out = Vec::new();
        print_data(&a, a.cell_box(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("(1,0) 0"));
    }
}
