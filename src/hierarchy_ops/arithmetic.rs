use rand::Rng;
use crate::descriptor::DataId;
use crate::geometry::CenteringKind;
use crate::message::reduce::Reducer;
use crate::patch_ops;
use crate::scalar::Scalar;
use super::HierarchyDataOps;




/**
 * Elementwise arithmetic. Each operation visits the patch interiors, or the
 * ghost boxes of the destination when `interior_only` is false. A source may
 * be the same variable as the destination.
 */
impl<'h, C, T, R> HierarchyDataOps<'h, C, T, R>
where
    C: CenteringKind,
    T: Scalar,
    R: Reducer,
{
    pub fn set_to_scalar(&mut self, dst: DataId, alpha: T, interior_only: bool) {
        self.drive_fill(dst, interior_only, |d, r| patch_ops::set_to_scalar(d, alpha, r))
    }

    /// `dst = alpha * src`
    pub fn scale(&mut self, dst: DataId, alpha: T, src: DataId, interior_only: bool) {
        self.drive_unary::<T, _>(dst, src, None, interior_only, |d, s, _, r| patch_ops::scale(d, alpha, s, r))
    }

    /// `dst = src + alpha`
    pub fn add_scalar(&mut self, dst: DataId, src: DataId, alpha: T, interior_only: bool) {
        self.drive_unary::<T, _>(dst, src, None, interior_only, |d, s, _, r| patch_ops::add_scalar(d, s, alpha, r))
    }

    pub fn add(&mut self, dst: DataId, a: DataId, b: DataId, interior_only: bool) {
        self.drive_binary(dst, a, b, interior_only, patch_ops::add)
    }

    pub fn subtract(&mut self, dst: DataId, a: DataId, b: DataId, interior_only: bool) {
        self.drive_binary(dst, a, b, interior_only, patch_ops::subtract)
    }

    pub fn multiply(&mut self, dst: DataId, a: DataId, b: DataId, interior_only: bool) {
        self.drive_binary(dst, a, b, interior_only, patch_ops::multiply)
    }

    /// `dst = a / b`. Zero denominators are not guarded: floating point data
    /// gets IEEE results and integer data panics.
    pub fn divide(&mut self, dst: DataId, a: DataId, b: DataId, interior_only: bool) {
        self.drive_binary(dst, a, b, interior_only, patch_ops::divide)
    }

    /// `dst = 1 / src`, unguarded like `divide`.
    pub fn reciprocal(&mut self, dst: DataId, src: DataId, interior_only: bool) {
        self.drive_unary::<T, _>(dst, src, None, interior_only, |d, s, _, r| patch_ops::reciprocal(d, s, r))
    }

    /// `dst = alpha * a + beta * b`
    pub fn linear_sum(&mut self, dst: DataId, alpha: T, a: DataId, beta: T, b: DataId, interior_only: bool) {
        self.drive_binary(dst, a, b, interior_only, |d, x, y, r| patch_ops::linear_sum(d, alpha, x, beta, y, r))
    }

    /// `dst = alpha * a + b`
    pub fn axpy(&mut self, dst: DataId, alpha: T, a: DataId, b: DataId, interior_only: bool) {
        self.drive_binary(dst, a, b, interior_only, |d, x, y, r| patch_ops::axpy(d, alpha, x, y, r))
    }

    /// `dst = alpha * a - b`
    pub fn axmy(&mut self, dst: DataId, alpha: T, a: DataId, b: DataId, interior_only: bool) {
        self.drive_binary(dst, a, b, interior_only, |d, x, y, r| patch_ops::axmy(d, alpha, x, y, r))
    }

    /**
     * `dst = |src|`. The destination holds the real element type of `T`, so
     * for complex data it must be registered as double data.
     */
    pub fn abs(&mut self, dst: DataId, src: DataId, interior_only: bool) {
        self.drive_unary::<T::Real, _>(dst, src, None, interior_only, |d, s, _, r| patch_ops::abs(d, s, r))
    }

    /**
     * Fill `dst` with values drawn uniformly from `[low, low + width)`,
     * component-wise for complex data. The generator is supplied by the
     * caller, so fills are reproducible.
     */
    pub fn set_random_values<G: Rng + ?Sized>(&mut self, dst: DataId, width: T, low: T, interior_only: bool, rng: &mut G) {
        self.drive_fill(dst, interior_only, |d, r| patch_ops::set_random_values(d, width, low, r, rng))
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use crate::geometry::Centering;
    use crate::hierarchy_ops::test::two_level_hierarchy;
    use crate::hierarchy_ops::{HierarchyCellDataOps, HierarchyDataOps, HierarchyFaceDataOps};
    use crate::descriptor::PatchDescriptor;
    use crate::hierarchy::PatchHierarchy;
    use crate::index_space::range2d;
    use crate::int_vector::IntVector;
    use crate::message::comm::SerialCommunicator;
    use num_complex::Complex64;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn copy_then_subtract_gives_zero() {
        let (mut h, [a, b, ..]) = two_level_hierarchy(Centering::Face);
        let comm = SerialCommunicator;
        let mut ops: HierarchyFaceDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        let mut rng = SmallRng::seed_from_u64(11);

        ops.set_random_values(b, 10.0, -5.0, false, &mut rng);
        ops.copy_data(a, b, true);
        ops.subtract(a, a, b, true);
        assert_eq!(ops.max_norm(a, None, false), 0.0);
    }

    #[test]
    fn sources_may_alias_the_destination() {
        let (mut h, [a, b, ..]) = two_level_hierarchy(Centering::Cell);
        let comm = SerialCommunicator;
        let mut ops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        ops.set_to_scalar(a, 3.0, false);
        ops.set_to_scalar(b, 2.0, false);
        ops.multiply(a, a, a, true);
        assert_eq!(ops.max(a, true), 9.0);
        ops.axmy(a, 2.0, b, a, true);
        assert_eq!(ops.min(a, true), -5.0);
        ops.scale(b, -1.0, b, false);
        ops.add_scalar(b, b, 0.5, false);
        assert_eq!(ops.max(b, false), -1.5);
    }

    #[test]
    fn arithmetic_over_the_whole_hierarchy() {
        let (mut h, [a, b, c, _]) = two_level_hierarchy(Centering::Node);
        let comm = SerialCommunicator;
        let mut ops = HierarchyDataOps::<crate::geometry::NodeCentered, f64, _>::new(&mut h, &comm);
        ops.set_to_scalar(a, 6.0, false);
        ops.set_to_scalar(b, 4.0, false);
        ops.linear_sum(c, 0.5, a, 2.0, b, false);
        assert_eq!(ops.max(c, false), 11.0);
        ops.divide(c, a, b, true);
        assert_eq!(ops.min(c, true), 1.5);
        ops.reciprocal(c, b, true);
        assert_eq!(ops.max(c, true), 0.25);
        ops.axpy(c, -1.0, a, b, true);
        assert_eq!(ops.max(c, true), -2.0);
        ops.add(c, a, b, true);
        assert_eq!(ops.min(c, true), 10.0);
    }

    #[test]
    fn interior_only_leaves_ghosts_untouched() {
        let (mut h, [a, ..]) = two_level_hierarchy(Centering::Cell);
        let comm = SerialCommunicator;
        let mut ops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        ops.set_to_scalar(a, -1.0, false);
        ops.set_to_scalar(a, 1.0, true);
        assert_eq!(ops.min(a, true), 1.0);
        assert_eq!(ops.min(a, false), -1.0);
    }

    #[test]
    fn complex_abs_writes_double_data() {
        let mut d = PatchDescriptor::new();
        let z = d.define::<Complex64>("z", Centering::Cell, 1, IntVector::zero(2)).unwrap();
        let m = d.define::<f64>("m", Centering::Cell, 1, IntVector::zero(2)).unwrap();
        let mut h = PatchHierarchy::new(2, d, 0, 1).unwrap();
        h.make_level(vec![range2d(0..3, 0..3)], vec![0], IntVector::one(2)).unwrap();

        let comm = SerialCommunicator;
        let mut zops: HierarchyCellDataOps<Complex64, _> = HierarchyDataOps::new(&mut h, &comm);
        zops.set_to_scalar(z, Complex64::new(-6.0, 8.0), true);
        zops.abs(m, z, true);
        drop(zops);

        let dops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        assert_eq!(dops.max(m, true), 10.0);
    }

    #[test]
    fn random_fills_are_reproducible_and_in_range() {
        let (mut h, [a, b, ..]) = two_level_hierarchy(Centering::Cell);
        let comm = SerialCommunicator;
        let mut ops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        ops.set_random_values(a, 2.0, 1.0, true, &mut SmallRng::seed_from_u64(3));
        ops.set_random_values(b, 2.0, 1.0, true, &mut SmallRng::seed_from_u64(3));
        assert!(ops.min(a, true) >= 1.0);
        assert!(ops.max(a, true) < 3.0);
        ops.subtract(a, a, b, true);
        assert_eq!(ops.max_norm(a, None, false), 0.0);
    }
}
