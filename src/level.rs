use serde::{Deserialize, Serialize};
use crate::box_container::BoxContainer;
use crate::descriptor::PatchDescriptor;
use crate::index_space::IndexSpace;
use crate::int_vector::IntVector;
use crate::patch::{Patch, PatchId};




/**
 * One refinement level of a hierarchy. Every process holds the global list of
 * patch boxes and their owner ranks, but only the patches owned by this
 * process carry data.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchLevel {
    number: usize,
    ratio_to_coarser: IntVector,
    ratio_to_level_zero: IntVector,
    boxes: Vec<IndexSpace>,
    owners: Vec<usize>,
    patches: Vec<Patch>,
}




// ============================================================================
impl PatchLevel {

    /**
     * Generate a level from its global box list. The caller is responsible
     * for validating the boxes; see `PatchHierarchy::make_level`.
     */
    pub(crate) fn new(
        number: usize,
        ratio_to_coarser: IntVector,
        ratio_to_level_zero: IntVector,
        boxes: Vec<IndexSpace>,
        owners: Vec<usize>,
        rank: usize,
        descriptor: &PatchDescriptor) -> Self
    {
        let patches = boxes
            .iter()
            .zip(&owners)
            .enumerate()
            .filter(|(_, (_, &owner))| owner == rank)
            .map(|(index, (space, &owner))| Patch::new(PatchId { level: number, index }, *space, owner, descriptor))
            .collect();

        Self { number, ratio_to_coarser, ratio_to_level_zero, boxes, owners, patches }
    }

    pub fn level_number(&self) -> usize {
        self.number
    }

    pub fn ratio_to_coarser(&self) -> IntVector {
        self.ratio_to_coarser
    }

    pub fn ratio_to_level_zero(&self) -> IntVector {
        self.ratio_to_level_zero
    }

    /// The boxes of all patches on this level, across all processes.
    pub fn boxes(&self) -> &[IndexSpace] {
        &self.boxes
    }

    pub fn owners(&self) -> &[usize] {
        &self.owners
    }

    pub fn box_container(&self) -> BoxContainer {
        self.boxes.iter().cloned().collect()
    }

    /// The global number of patches on this level.
    pub fn number_of_patches(&self) -> usize {
        self.boxes.len()
    }

    pub fn local_patch_count(&self) -> usize {
        self.patches.len()
    }

    /// The patches owned by this process, in global index order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patches_mut(&mut self) -> &mut [Patch] {
        &mut self.patches
    }

    /// Look up a locally owned patch by its global index on this level.
    pub fn patch(&self, index: usize) -> Option<&Patch> {
        self.patches
            .binary_search_by_key(&index, |p| p.id().index)
            .ok()
            .map(|i| &self.patches[i])
    }

    pub fn patch_mut(&mut self, index: usize) -> Option<&mut Patch> {
        match self.patches.binary_search_by_key(&index, |p| p.id().index) {
            Ok(i) => Some(&mut self.patches[i]),
            Err(_) => None,
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::PatchLevel;
    use crate::descriptor::PatchDescriptor;
    use crate::geometry::Centering;
    use crate::index_space::range2d;
    use crate::int_vector::IntVector;

    #[test]
    fn only_owned_patches_carry_data() {
        let mut d = PatchDescriptor::new();
        d.define::<f64>("u", Centering::Cell, 1, IntVector::zero(2)).unwrap();

        let boxes = vec![range2d(0..4, 0..4), range2d(4..8, 0..4), range2d(8..12, 0..4)];
        let level = PatchLevel::new(0, IntVector::one(2), IntVector::one(2), boxes, vec![1, 0, 1], 1, &d);

        assert_eq!(level.number_of_patches(), 3);
        assert_eq!(level.local_patch_count(), 2);
        assert!(level.patch(0).is_some());
        assert!(level.patch(1).is_none());
        assert_eq!(level.patch(2).map(|p| *p.index_space()), Some(range2d(8..12, 0..4)));
    }
}
