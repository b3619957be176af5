//! Hierarchy-wide data operations.
//!
//! `HierarchyDataOps` drives the single-patch operators over every locally
//! owned patch of every level in a level range, and combines scalar results
//! across processes with exactly one collective reduction per call. It is
//! generic over the centering of the data and its element type; the aliases
//! `HierarchyCellDataOps` etc. select a centering.
//!
//! The operator borrows the hierarchy. Regridding the hierarchy through
//! `hierarchy_mut` leaves the level range and the non-overlapping
//! decompositions stale until `reset_levels` is called again.
//!
//! Every process must issue the scalar-producing operations in the same
//! order, since each of them blocks in a collective.

mod arithmetic;
mod reductions;

use std::borrow::Cow;
use std::io::{self, Write};
use std::marker::PhantomData;
use log::debug;
use crate::box_container::{make_non_overlapping, BoxContainer};
use crate::descriptor::DataId;
use crate::error::Error;
use crate::geometry::{CellCentered, CenteringKind, EdgeCentered, FaceCentered, NodeCentered};
use crate::hierarchy::PatchHierarchy;
use crate::index_space::IndexSpace;
use crate::level::PatchLevel;
use crate::message::reduce::{Reducer, Reducible};
use crate::patch::Patch;
use crate::patch_data::{PatchArray, PatchData};
use crate::patch_ops;
use crate::scalar::{ElementType, Scalar};




pub type HierarchyCellDataOps<'h, T, R> = HierarchyDataOps<'h, CellCentered, T, R>;
pub type HierarchyFaceDataOps<'h, T, R> = HierarchyDataOps<'h, FaceCentered, T, R>;
pub type HierarchyEdgeDataOps<'h, T, R> = HierarchyDataOps<'h, EdgeCentered, T, R>;
pub type HierarchyNodeDataOps<'h, T, R> = HierarchyDataOps<'h, NodeCentered, T, R>;




/**
 * The non-overlapping decomposition of one level: for each geometry
 * component, one box container per patch of the level, in global patch
 * order. The level boxes it was built from are kept to detect regridding.
 */
#[derive(Clone, Debug)]
struct LevelDecomposition {
    boxes: Vec<IndexSpace>,
    pieces: Vec<Vec<BoxContainer>>,
}

#[derive(Clone, Debug)]
enum State {
    Unbound,
    Bound {
        coarsest: usize,
        finest: usize,
        levels: Vec<LevelDecomposition>,
    },
}




/**
 * Data operations over a range of levels of a patch hierarchy, for data of
 * centering `C` and element type `T`, reducing across processes through `R`.
 *
 * Until a level range is set, every data operation panics.
 *
 * The operators hold the hierarchy by exclusive borrow, so only one view of
 * a hierarchy exists at a time. To work on the same hierarchy with another
 * centering or element type, drop the current operators (or let them go out
 * of scope) before creating the next ones; the patch data persists in the
 * hierarchy.
 */
pub struct HierarchyDataOps<'h, C, T, R> {
    hierarchy: &'h mut PatchHierarchy,
    comm: &'h R,
    state: State,
    marker: PhantomData<(C, T)>,
}




// ============================================================================
impl<'h, C, T, R> HierarchyDataOps<'h, C, T, R>
where
    C: CenteringKind,
    T: Scalar,
    R: Reducer,
{

    /**
     * Create operators over all levels of the hierarchy. If the hierarchy has
     * no levels yet, the operators start out unbound.
     */
    pub fn new(hierarchy: &'h mut PatchHierarchy, comm: &'h R) -> Self {
        let mut ops = Self { hierarchy, comm, state: State::Unbound, marker: PhantomData };

        if let Some(finest) = ops.hierarchy.finest_level_number() {
            ops.reset_levels(0, finest)
        }
        ops
    }

    /**
     * Create operators over the levels `coarsest..=finest`.
     */
    pub fn with_levels(hierarchy: &'h mut PatchHierarchy, comm: &'h R, coarsest: usize, finest: usize) -> Result<Self, Error> {
        let mut ops = Self { hierarchy, comm, state: State::Unbound, marker: PhantomData };
        ops.try_reset_levels(coarsest, finest)?;
        Ok(ops)
    }

    /**
     * Bind the operators to the levels `coarsest..=finest` and rebuild the
     * non-overlapping decompositions of those levels. This must be called
     * again after the hierarchy is regridded.
     */
    pub fn try_reset_levels(&mut self, coarsest: usize, finest: usize) -> Result<(), Error> {
        let finest_in_hierarchy = self.hierarchy.finest_level_number();

        if coarsest > finest || finest_in_hierarchy.map_or(true, |f| finest > f) {
            return Err(Error::InvalidLevelRange { coarsest, finest, finest_in_hierarchy })
        }
        let levels: Vec<_> = (coarsest..=finest)
            .map(|ln| self.decompose(ln))
            .collect();

        debug!(
            "{} data ops: levels {}..={} bound, {} non-overlapping boxes",
            C::CENTERING,
            coarsest,
            finest,
            levels.iter().flat_map(|l| l.pieces.iter().flatten()).map(BoxContainer::len).sum::<usize>());

        self.state = State::Bound { coarsest, finest, levels };
        Ok(())
    }

    /**
     * Like `try_reset_levels`, but panics on an invalid range.
     */
    pub fn reset_levels(&mut self, coarsest: usize, finest: usize) {
        if let Err(e) = self.try_reset_levels(coarsest, finest) {
            panic!("{}", e)
        }
    }

    /// The bound level range, or `None` while unbound.
    pub fn level_range(&self) -> Option<(usize, usize)> {
        match self.state {
            State::Unbound => None,
            State::Bound { coarsest, finest, .. } => Some((coarsest, finest)),
        }
    }

    pub fn hierarchy(&self) -> &PatchHierarchy {
        &*self.hierarchy
    }

    /// Mutable access to the hierarchy, e.g. to regrid it. The level range
    /// must be reset afterwards.
    pub fn hierarchy_mut(&mut self) -> &mut PatchHierarchy {
        &mut *self.hierarchy
    }

    fn decompose(&self, ln: usize) -> LevelDecomposition {
        let boxes = self.hierarchy.level(ln).boxes().to_vec();
        let pieces = C::CENTERING
            .geometries(self.hierarchy.dim())
            .map(|g| {
                let geometry_boxes: Vec<_> = boxes.iter().map(|b| g.to_geometry_box(b)).collect();
                make_non_overlapping(&geometry_boxes)
            })
            .collect();

        LevelDecomposition { boxes, pieces }
    }




    // ------------------------------------------------------------------------
    fn range(&self) -> (usize, usize) {
        match self.state {
            State::Unbound => panic!("{} data ops used before a level range was set", C::CENTERING),
            State::Bound { coarsest, finest, .. } => {
                #[cfg(any(debug_assertions, feature = "check-invariants"))]
                assert!(
                    self.hierarchy.finest_level_number().map_or(false, |f| finest <= f),
                    "level range [{}, {}] exceeds the hierarchy; reset the level range after regridding",
                    coarsest,
                    finest);
                (coarsest, finest)
            }
        }
    }

    fn patches(&self) -> impl Iterator<Item = &Patch> + '_ {
        let (coarsest, finest) = self.range();
        self.hierarchy.levels()[coarsest..=finest]
            .iter()
            .flat_map(PatchLevel::patches)
    }

    fn patches_mut(&mut self) -> impl Iterator<Item = &mut Patch> + '_ {
        let (coarsest, finest) = self.range();
        self.hierarchy.levels_mut()[coarsest..=finest]
            .iter_mut()
            .flat_map(PatchLevel::patches_mut)
    }

    /**
     * Panic unless the variable is registered with this centering and the
     * given element type.
     */
    fn check_variable(&self, id: DataId, element: ElementType) {
        let info = self.hierarchy.descriptor().info(id);

        if info.centering != C::CENTERING || info.element != element {
            panic!(
                "data {} (`{}`) is {}-centered {:?} data, expected {}-centered {:?} data",
                id, info.name, info.centering, info.element, C::CENTERING, element)
        }
    }

    fn check_control_volume(&self, vol: Option<DataId>) {
        if let Some(v) = vol {
            self.check_variable(v, ElementType::Double)
        }
    }

    /**
     * Apply `op` on every local patch, with `dst` borrowed mutably and `src`
     * (plus the control volume, if any) readable. The region is the patch
     * interior or the ghost box of `dst`.
     */
    fn drive_unary<U, F>(&mut self, dst: DataId, src: DataId, vol: Option<DataId>, interior_only: bool, mut op: F)
    where
        U: Scalar,
        F: FnMut(&mut PatchArray<U>, &PatchArray<T>, Option<&PatchArray<f64>>, &IndexSpace)
    {
        self.check_variable(dst, U::ELEMENT);
        self.check_variable(src, T::ELEMENT);
        self.check_control_volume(vol);

        for patch in self.patches_mut() {
            let cell_box = *patch.index_space();
            let (d, [s, w]) = patch.split_data(dst, [src, vol.unwrap_or(src)]);
            let s = operand(s, d);
            let w = vol.map(|_| operand(w, d));
            let d = typed_mut::<U>(d, dst);
            let region = if interior_only { cell_box } else { d.ghost_box() };

            op(d, typed(&s, src), w.as_deref().zip(vol).map(|(w, v)| typed(w, v)), &region)
        }
    }

    fn drive_binary<F>(&mut self, dst: DataId, a: DataId, b: DataId, interior_only: bool, mut op: F)
    where
        F: FnMut(&mut PatchArray<T>, &PatchArray<T>, &PatchArray<T>, &IndexSpace)
    {
        self.check_variable(dst, T::ELEMENT);
        self.check_variable(a, T::ELEMENT);
        self.check_variable(b, T::ELEMENT);

        for patch in self.patches_mut() {
            let cell_box = *patch.index_space();
            let (d, [x, y]) = patch.split_data(dst, [a, b]);
            let (x, y) = (operand(x, d), operand(y, d));
            let d = typed_mut::<T>(d, dst);
            let region = if interior_only { cell_box } else { d.ghost_box() };

            op(d, typed(&x, a), typed(&y, b), &region)
        }
    }

    fn drive_fill<F>(&mut self, dst: DataId, interior_only: bool, mut op: F)
    where
        F: FnMut(&mut PatchArray<T>, &IndexSpace)
    {
        self.check_variable(dst, T::ELEMENT);

        for patch in self.patches_mut() {
            let cell_box = *patch.index_space();
            let d = typed_mut::<T>(patch.patch_data_mut(dst), dst);
            let region = if interior_only { cell_box } else { d.ghost_box() };
            op(d, &region)
        }
    }

    fn global_sum<V: Reducible>(&self, value: V, local_only: bool) -> V {
        if local_only {
            value
        } else {
            self.comm.reduce_sum(value)
        }
    }




    // ------------------------------------------------------------------------
    /**
     * Copy `src` into `dst` over the patch interiors, or over the ghost boxes
     * of `dst`.
     */
    pub fn copy_data(&mut self, dst: DataId, src: DataId, interior_only: bool) {
        self.drive_unary::<T, _>(dst, src, None, interior_only, |d, s, _, r| patch_ops::copy(d, s, r))
    }

    /**
     * Exchange the contents of two variables on every local patch. The two
     * variables must agree in depth and ghost width; in checked builds this
     * is verified before anything is swapped.
     */
    pub fn swap_data(&mut self, a: DataId, b: DataId) {
        self.check_variable(a, T::ELEMENT);
        self.check_variable(b, T::ELEMENT);

        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        {
            let (x, y) = (self.hierarchy.descriptor().info(a), self.hierarchy.descriptor().info(b));
            assert_eq!(x.depth, y.depth, "cannot swap `{}` and `{}`: depths differ", x.name, y.name);
            assert_eq!(x.ghost, y.ghost, "cannot swap `{}` and `{}`: ghost widths differ", x.name, y.name);
        }

        for patch in self.patches_mut() {
            patch.swap_data(a, b)
        }
    }

    /**
     * Write the data of a variable on every local patch, level by level.
     */
    pub fn print_data<W: Write + ?Sized>(&self, id: DataId, out: &mut W, interior_only: bool) -> io::Result<()> {
        self.check_variable(id, T::ELEMENT);

        let (coarsest, finest) = self.range();
        let info = self.hierarchy.descriptor().info(id);

        writeln!(out, "data {} `{}`: {}-centered {:?}, depth {}", id, info.name, info.centering, info.element, info.depth)?;

        for ln in coarsest..=finest {
            writeln!(out, "level {}", ln)?;

            for patch in self.hierarchy.level(ln).patches() {
                let data = array::<T>(patch, id);
                let region = if interior_only { *patch.index_space() } else { data.ghost_box() };
                writeln!(out, "patch {} on {}", patch.id().index, patch.index_space())?;
                patch_ops::print_data(data, &region, out)?;
            }
        }
        Ok(())
    }

    /**
     * Return the number of entries of a variable across the level range. Over
     * the interiors, entries shared by adjacent patches (faces, edges, nodes
     * on a common boundary) are counted once; over the ghost boxes each
     * patch's array is counted in full. Panics if a level in the range was
     * regridded since the level range was last set.
     */
    pub fn number_of_entries(&self, id: DataId, interior_only: bool) -> usize {
        self.try_number_of_entries(id, interior_only)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /**
     * Like `number_of_entries`, but returns `Error::StaleDecomposition` when
     * a level was regridded without resetting the level range. Every process
     * holds the same level boxes, so every process returns the error and
     * none enters the collective.
     */
    pub fn try_number_of_entries(&self, id: DataId, interior_only: bool) -> Result<usize, Error> {
        self.check_variable(id, T::ELEMENT);

        let depth = self.hierarchy.descriptor().info(id).depth;
        let local: usize = if interior_only {
            let (coarsest, levels) = match &self.state {
                State::Bound { coarsest, levels, .. } => (*coarsest, levels),
                State::Unbound => panic!("{} data ops used before a level range was set", C::CENTERING),
            };
            let mut local = 0;

            for (i, decomposition) in levels.iter().enumerate() {
                let ln = coarsest + i;
                let stale = || Error::StaleDecomposition { level: ln };
                let level = self.hierarchy
                    .levels()
                    .get(ln)
                    .filter(|level| decomposition.boxes == level.boxes())
                    .ok_or_else(stale)?;

                for patch in level.patches() {
                    for pieces in &decomposition.pieces {
                        local += pieces.get(patch.id().index).ok_or_else(stale)?.total_len() * depth;
                    }
                }
            }
            local
        } else {
            self.patches()
                .map(|p| {
                    let data = array::<T>(p, id);
                    patch_ops::number_of_entries(data, &data.ghost_box())
                })
                .sum()
        };
        Ok(self.comm.reduce_sum(local))
    }

    /**
     * Return the total number of entries of a variable without removing
     * entries shared between patches: the patch boxes mapped to each
     * geometry, or the full component arrays.
     */
    pub fn length(&self, id: DataId, interior_only: bool) -> u64 {
        self.check_variable(id, T::ELEMENT);

        let local: u64 = self
            .patches()
            .map(|p| {
                let data = array::<T>(p, id);
                let region = if interior_only { *p.index_space() } else { data.ghost_box() };
                patch_ops::number_of_entries(data, &region) as u64
            })
            .sum();

        self.comm.reduce_sum(local)
    }
}




// ============================================================================
fn operand<'a>(source: Option<&'a PatchData>, dst: &PatchData) -> Cow<'a, PatchData> {
    source.map_or_else(|| Cow::Owned(dst.clone()), Cow::Borrowed)
}

fn typed<U: Scalar>(data: &PatchData, id: DataId) -> &PatchArray<U> {
    U::unwrap_ref(data)
        .unwrap_or_else(|| panic!("data {} holds {:?} values, expected {:?}", id, data.element_type(), U::ELEMENT))
}

fn typed_mut<U: Scalar>(data: &mut PatchData, id: DataId) -> &mut PatchArray<U> {
    let element = data.element_type();
    U::unwrap_mut(data)
        .unwrap_or_else(|| panic!("data {} holds {:?} values, expected {:?}", id, element, U::ELEMENT))
}

fn array<U: Scalar>(patch: &Patch, id: DataId) -> &PatchArray<U> {
    typed(patch.patch_data(id), id)
}
