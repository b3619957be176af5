use crate::descriptor::DataId;
use crate::geometry::CenteringKind;
use crate::index_space::IndexSpace;
use crate::message::reduce::Reducer;
use crate::patch::Patch;
use crate::patch_data::PatchArray;
use crate::patch_ops;
use crate::scalar::{FieldScalar, OrderedScalar, Scalar};
use super::{array, HierarchyDataOps};




/**
 * Resolve the data and optional control volume of a patch, and the region a
 * weighted reduction covers: the patch interior without a control volume,
 * and the ghost box of the data with one, since the control volume is zero
 * wherever entries must not count.
 */
fn weighted<'p, T: Scalar>(patch: &'p Patch, id: DataId, vol: Option<DataId>) -> (&'p PatchArray<T>, Option<&'p PatchArray<f64>>, IndexSpace) {
    let data = array::<T>(patch, id);
    let cvol = vol.map(|v| array::<f64>(patch, v));
    let region = if cvol.is_some() { data.ghost_box() } else { *patch.index_space() };
    (data, cvol, region)
}




/**
 * Norms and sums. Each returns the same value on every process, at the cost
 * of one collective, unless `local_only` is set, in which case the partial
 * result of this process is returned without communication.
 */
impl<'h, C, T, R> HierarchyDataOps<'h, C, T, R>
where
    C: CenteringKind,
    T: Scalar,
    R: Reducer,
{

    /// Sum of the control volumes of every entry of the variable.
    pub fn sum_control_volumes(&self, id: DataId, vol: DataId) -> f64 {
        self.check_variable(id, T::ELEMENT);
        self.check_control_volume(Some(vol));

        let local: f64 = self
            .patches()
            .map(|p| {
                let (data, cvol, region) = weighted::<T>(p, id, Some(vol));
                cvol.map_or(0.0, |cv| patch_ops::sum_control_volumes(data, cv, &region))
            })
            .sum();

        self.comm.reduce_sum(local)
    }

    /// `sum |x| cvol`
    pub fn l1_norm(&self, id: DataId, vol: Option<DataId>, local_only: bool) -> f64 {
        self.check_variable(id, T::ELEMENT);
        self.check_control_volume(vol);

        let local: f64 = self
            .patches()
            .map(|p| {
                let (data, cvol, region) = weighted::<T>(p, id, vol);
                patch_ops::l1_norm(data, cvol, &region)
            })
            .sum();

        self.global_sum(local, local_only)
    }

    /// `sqrt(sum x conj(x) cvol)`
    pub fn l2_norm(&self, id: DataId, vol: Option<DataId>, local_only: bool) -> f64 {
        self.check_variable(id, T::ELEMENT);
        self.check_control_volume(vol);

        let local: f64 = self
            .patches()
            .map(|p| {
                let (data, cvol, region) = weighted::<T>(p, id, vol);
                patch_ops::l2_norm_squared(data, cvol, &region)
            })
            .sum();

        self.global_sum(local, local_only).sqrt()
    }

    /// `sqrt(sum |x wgt|^2 cvol)`
    pub fn weighted_l2_norm(&self, id: DataId, wgt: DataId, vol: Option<DataId>) -> f64 {
        self.check_variable(id, T::ELEMENT);
        self.check_variable(wgt, T::ELEMENT);
        self.check_control_volume(vol);

        let local: f64 = self
            .patches()
            .map(|p| {
                let (data, cvol, region) = weighted::<T>(p, id, vol);
                patch_ops::weighted_l2_norm_squared(data, array::<T>(p, wgt), cvol, &region)
            })
            .sum();

        self.comm.reduce_sum(local).sqrt()
    }

    /**
     * The L2 norm divided by the square root of the total control volume,
     * or of the number of entries when there is no control volume. Issues
     * two collectives.
     */
    pub fn rms_norm(&self, id: DataId, vol: Option<DataId>) -> f64 {
        let l2 = self.l2_norm(id, vol, false);
        l2 / self.rms_volume(id, vol).sqrt()
    }

    /// The weighted L2 norm, normalized like `rms_norm`.
    pub fn weighted_rms_norm(&self, id: DataId, wgt: DataId, vol: Option<DataId>) -> f64 {
        let l2 = self.weighted_l2_norm(id, wgt, vol);
        l2 / self.rms_volume(id, vol).sqrt()
    }

    fn rms_volume(&self, id: DataId, vol: Option<DataId>) -> f64 {
        match vol {
            Some(v) => self.sum_control_volumes(id, v),
            None => self.number_of_entries(id, true) as f64,
        }
    }

    /// Largest `|x|` over entries with a positive control volume.
    pub fn max_norm(&self, id: DataId, vol: Option<DataId>, local_only: bool) -> f64 {
        self.check_variable(id, T::ELEMENT);
        self.check_control_volume(vol);

        let local = self
            .patches()
            .map(|p| {
                let (data, cvol, region) = weighted::<T>(p, id, vol);
                patch_ops::max_norm(data, cvol, &region)
            })
            .fold(0.0, f64::max);

        if local_only {
            local
        } else {
            self.comm.reduce_max(local)
        }
    }
}




// ============================================================================
impl<'h, C, T, R> HierarchyDataOps<'h, C, T, R>
where
    C: CenteringKind,
    T: FieldScalar,
    R: Reducer,
{

    /// `sum a conj(b) cvol`
    pub fn dot(&self, a: DataId, b: DataId, vol: Option<DataId>, local_only: bool) -> T {
        self.check_variable(a, T::ELEMENT);
        self.check_variable(b, T::ELEMENT);
        self.check_control_volume(vol);

        let local = self
            .patches()
            .map(|p| {
                let (x, cvol, region) = weighted::<T>(p, a, vol);
                patch_ops::dot(x, array::<T>(p, b), cvol, &region)
            })
            .fold(T::zero(), |acc, x| acc + x);

        self.global_sum(local, local_only)
    }

    /// `sum x cvol`, over the ghost boxes.
    pub fn integral(&self, id: DataId, vol: DataId) -> T {
        self.check_variable(id, T::ELEMENT);
        self.check_control_volume(Some(vol));

        let local = self
            .patches()
            .map(|p| {
                let (data, cvol, region) = weighted::<T>(p, id, Some(vol));
                cvol.map_or(T::zero(), |cv| patch_ops::integral(data, cv, &region))
            })
            .fold(T::zero(), |acc, x| acc + x);

        self.comm.reduce_sum(local)
    }
}




// ============================================================================
impl<'h, C, T, R> HierarchyDataOps<'h, C, T, R>
where
    C: CenteringKind,
    T: OrderedScalar,
    R: Reducer,
{

    /// Smallest value of the variable. Over an empty range this is the
    /// maximum value of `T`.
    pub fn min(&self, id: DataId, interior_only: bool) -> T {
        self.check_variable(id, T::ELEMENT);

        let local = self
            .patches()
            .map(|p| {
                let data = array::<T>(p, id);
                let region = if interior_only { *p.index_space() } else { data.ghost_box() };
                patch_ops::min(data, &region)
            })
            .fold(T::max_value(), |acc, x| if x < acc { x } else { acc });

        self.comm.reduce_min(local)
    }

    /// Largest value of the variable. Over an empty range this is the
    /// negated maximum value of `T`.
    pub fn max(&self, id: DataId, interior_only: bool) -> T {
        self.check_variable(id, T::ELEMENT);

        let local = self
            .patches()
            .map(|p| {
                let data = array::<T>(p, id);
                let region = if interior_only { *p.index_space() } else { data.ghost_box() };
                patch_ops::max(data, &region)
            })
            .fold(-T::max_value(), |acc, x| if x > acc { x } else { acc });

        self.comm.reduce_max(local)
    }
}




/**
 * Operations on real data only.
 */
impl<'h, C, T, R> HierarchyDataOps<'h, C, T, R>
where
    C: CenteringKind,
    T: OrderedScalar + Scalar<Real = T>,
    R: Reducer,
{

    /**
     * Set `dst` to one where `|src| >= alpha` and to zero elsewhere. With a
     * control volume, the ghost boxes are visited and entries with a
     * non-positive control volume are left alone.
     */
    pub fn compare_to_scalar(&mut self, dst: DataId, src: DataId, alpha: T, vol: Option<DataId>) {
        self.drive_unary::<T, _>(dst, src, vol, vol.is_none(), |d, s, w, r| patch_ops::compare_to_scalar(d, s, alpha, w, r))
    }

    /**
     * Set `dst = 1 / src` where `src` is nonzero and zero elsewhere. Returns
     * zero on every process if any process found a zero, and one otherwise.
     */
    pub fn test_reciprocal(&mut self, dst: DataId, src: DataId, vol: Option<DataId>) -> i32 {
        let mut test = 1;

        self.drive_unary::<T, _>(dst, src, vol, vol.is_none(), |d, s, w, r| {
            test = test.min(patch_ops::test_reciprocal(d, s, w, r))
        });
        self.comm.reduce_min(test)
    }

    /**
     * Return one if `a * b > 0` wherever the constraint `a` is nonzero (and
     * the control volume positive), and zero otherwise.
     */
    pub fn compute_constr_prod_pos(&self, a: DataId, b: DataId, vol: Option<DataId>) -> i32 {
        self.check_variable(a, T::ELEMENT);
        self.check_variable(b, T::ELEMENT);
        self.check_control_volume(vol);

        let local = self
            .patches()
            .map(|p| {
                let (x, cvol, region) = weighted::<T>(p, a, vol);
                patch_ops::compute_constr_prod_pos(x, array::<T>(p, b), cvol, &region)
            })
            .min()
            .unwrap_or(1);

        self.comm.reduce_min(local)
    }

    /// Largest `|numer / denom|` over the patch interiors; entries with a
    /// zero denominator contribute `|numer|`.
    pub fn max_pointwise_divide(&self, numer: DataId, denom: DataId, local_only: bool) -> T {
        self.check_variable(numer, T::ELEMENT);
        self.check_variable(denom, T::ELEMENT);

        let local = self
            .patches()
            .map(|p| patch_ops::max_pointwise_divide(array::<T>(p, numer), array::<T>(p, denom), p.index_space()))
            .fold(T::zero(), |acc, x| if x > acc { x } else { acc });

        if local_only {
            local
        } else {
            self.comm.reduce_max(local)
        }
    }

    /// Smallest `numer / denom` over the patch interiors, skipping zero
    /// denominators.
    pub fn min_pointwise_divide(&self, numer: DataId, denom: DataId, local_only: bool) -> T {
        self.check_variable(numer, T::ELEMENT);
        self.check_variable(denom, T::ELEMENT);

        let local = self
            .patches()
            .map(|p| patch_ops::min_pointwise_divide(array::<T>(p, numer), array::<T>(p, denom), p.index_space()))
            .fold(T::max_value(), |acc, x| if x < acc { x } else { acc });

        if local_only {
            local
        } else {
            self.comm.reduce_min(local)
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use crate::descriptor::PatchDescriptor;
    use crate::geometry::{Centering, CellCentered};
    use crate::hierarchy::PatchHierarchy;
    use crate::hierarchy_ops::test::two_level_hierarchy;
    use crate::hierarchy_ops::{HierarchyCellDataOps, HierarchyDataOps};
    use crate::index_space::range2d;
    use crate::int_vector::IntVector;
    use crate::message::comm::SerialCommunicator;
    use crate::scalar::Scalar;
    use num_complex::Complex64;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Sets the control volume to `w` on the interiors of every patch and to
    /// zero on the ghosts.
    fn set_volume(ops: &mut HierarchyCellDataOps<f64, SerialCommunicator>, vol: crate::descriptor::DataId, w: f64) {
        ops.set_to_scalar(vol, 0.0, false);
        ops.set_to_scalar(vol, w, true);
    }

    #[test]
    fn serial_reductions_match_direct_accumulation() {
        let (mut h, [a, b, ..]) = two_level_hierarchy(Centering::Cell);
        let comm = SerialCommunicator;
        let mut ops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        let mut rng = SmallRng::seed_from_u64(5);
        ops.set_random_values(a, 4.0, -2.0, false, &mut rng);
        ops.set_random_values(b, 4.0, -2.0, false, &mut rng);

        let values = |id: crate::descriptor::DataId| -> Vec<(f64, f64)> {
            let mut out = Vec::new();
            for level in ops.hierarchy().levels() {
                for patch in level.patches() {
                    let (x, y) = (patch.data::<f64>(id).unwrap(), patch.data::<f64>(b).unwrap());
                    for i in patch.index_space() {
                        out.push((x.component(0).get(&i, 0), y.component(0).get(&i, 0)));
                    }
                }
            }
            out
        };
        let v = values(a);
        let min = v.iter().map(|p| p.0).fold(f64::MAX, f64::min);
        let max = v.iter().map(|p| p.0).fold(-f64::MAX, f64::max);
        let dot: f64 = v.iter().map(|p| p.0 * p.1).sum();
        let l2 = v.iter().map(|p| p.0 * p.0).sum::<f64>().sqrt();
        let l1: f64 = v.iter().map(|p| p.0.abs()).sum();

        assert_eq!(ops.min(a, true), min);
        assert_eq!(ops.max(a, true), max);
        assert!((ops.dot(a, b, None, false) - dot).abs() < 1e-12);
        assert!((ops.l2_norm(a, None, false) - l2).abs() < 1e-12);
        assert!((ops.l1_norm(a, None, true) - l1).abs() < 1e-12);
        assert!((ops.rms_norm(a, None) - l2 / (v.len() as f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn control_volumes_exclude_ghosts() {
        let (mut h, [a, _, _, vol]) = two_level_hierarchy(Centering::Cell);
        let comm = SerialCommunicator;
        let mut ops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        set_volume(&mut ops, vol, 0.25);
        ops.set_to_scalar(a, 2.0, false);

        assert_eq!(ops.sum_control_volumes(a, vol), 8.0);
        assert_eq!(ops.l1_norm(a, Some(vol), false), 16.0);
        assert_eq!(ops.integral(a, vol), 16.0);
        assert_eq!(ops.l2_norm(a, Some(vol), false), 32.0f64.sqrt());
        assert_eq!(ops.rms_norm(a, Some(vol)), 2.0);
        assert_eq!(ops.max_norm(a, Some(vol), false), 2.0);
        assert_eq!(ops.dot(a, a, Some(vol), false), 32.0);
    }

    #[test]
    fn weighted_norms_scale_by_the_weight() {
        let (mut h, [a, b, _, vol]) = two_level_hierarchy(Centering::Cell);
        let comm = SerialCommunicator;
        let mut ops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        set_volume(&mut ops, vol, 1.0);
        ops.set_to_scalar(a, 3.0, false);
        ops.set_to_scalar(b, 0.5, false);

        assert_eq!(ops.weighted_l2_norm(a, b, Some(vol)), 72.0f64.sqrt());
        assert!((ops.weighted_rms_norm(a, b, Some(vol)) - 1.5).abs() < 1e-12);
        assert!((ops.weighted_rms_norm(a, b, None) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn complex_dot_conjugates_the_second_argument() {
        let mut d = PatchDescriptor::new();
        let z = d.define::<Complex64>("z", Centering::Cell, 1, IntVector::zero(2)).unwrap();
        let w = d.define::<Complex64>("w", Centering::Cell, 1, IntVector::zero(2)).unwrap();
        let mut h = PatchHierarchy::new(2, d, 0, 1).unwrap();
        h.make_level(vec![range2d(0..2, 0..2)], vec![0], IntVector::one(2)).unwrap();

        let comm = SerialCommunicator;
        let mut ops = HierarchyDataOps::<CellCentered, Complex64, _>::new(&mut h, &comm);
        ops.set_to_scalar(z, Complex64::new(0.0, 1.0), true);
        ops.set_to_scalar(w, Complex64::new(0.0, 1.0), true);
        assert_eq!(ops.dot(z, w, None, false), Complex64::new(4.0, 0.0));
        assert_eq!(ops.l2_norm(z, None, false), 2.0);
        assert_eq!(Scalar::abs(ops.dot(z, z, None, true)), 4.0);
    }

    #[test]
    fn real_only_operations() {
        let (mut h, [a, b, c, _]) = two_level_hierarchy(Centering::Cell);
        let comm = SerialCommunicator;
        let mut ops: HierarchyCellDataOps<f64, _> = HierarchyDataOps::new(&mut h, &comm);
        ops.set_to_scalar(a, 4.0, false);
        ops.set_to_scalar(b, -2.0, false);

        assert_eq!(ops.max_pointwise_divide(a, b, false), 2.0);
        assert_eq!(ops.min_pointwise_divide(a, b, false), -2.0);
        assert_eq!(ops.compute_constr_prod_pos(a, b, None), 0);
        assert_eq!(ops.compute_constr_prod_pos(a, a, None), 1);

        assert_eq!(ops.test_reciprocal(c, a, None), 1);
        assert_eq!(ops.max(c, true), 0.25);
        ops.set_to_scalar(b, 0.0, true);
        assert_eq!(ops.test_reciprocal(c, b, None), 0);

        ops.compare_to_scalar(c, a, 5.0, None);
        assert_eq!(ops.max(c, true), 0.0);
        ops.compare_to_scalar(c, a, 4.0, None);
        assert_eq!(ops.min(c, true), 1.0);
    }
}
