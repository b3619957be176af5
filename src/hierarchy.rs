use log::info;
use crate::box_container::BoxContainer;
use crate::descriptor::PatchDescriptor;
use crate::error::Error;
use crate::index_space::IndexSpace;
use crate::int_vector::{IntVector, MAX_DIM};
use crate::level::PatchLevel;




/**
 * An ordered sequence of patch levels, coarsest first, as seen from one
 * process of a group. The hierarchy owns its levels and the levels own their
 * locally resident patches.
 *
 * Every level after the first refines a subset of the next coarser level by
 * an integer ratio per axis. Within a level, patch boxes do not overlap.
 */
#[derive(Clone, Debug)]
pub struct PatchHierarchy {
    dim: usize,
    descriptor: PatchDescriptor,
    rank: usize,
    num_ranks: usize,
    levels: Vec<PatchLevel>,
}




// ============================================================================
impl PatchHierarchy {

    /**
     * Generate an empty hierarchy in the given dimension, for process `rank`
     * of a group of `num_ranks`. Every variable in the descriptor must have a
     * ghost width of that dimension.
     */
    pub fn new(dim: usize, descriptor: PatchDescriptor, rank: usize, num_ranks: usize) -> Result<Self, Error> {
        if dim == 0 || dim > MAX_DIM {
            return Err(Error::UnsupportedDimension(dim))
        }
        if rank >= num_ranks {
            return Err(Error::InvalidRank { rank, num_ranks })
        }
        for (_, info) in descriptor.iter() {
            if info.ghost.dim() != dim {
                return Err(Error::DimensionMismatch { expected: dim, found: info.ghost.dim() })
            }
        }
        Ok(Self { dim, descriptor, rank, num_ranks, levels: Vec::new() })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn descriptor(&self) -> &PatchDescriptor {
        &self.descriptor
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn num_ranks(&self) -> usize {
        self.num_ranks
    }

    pub fn number_of_levels(&self) -> usize {
        self.levels.len()
    }

    /// The number of the finest level, or `None` if there are no levels.
    pub fn finest_level_number(&self) -> Option<usize> {
        self.levels.len().checked_sub(1)
    }

    /// Return a level by number. Panics if the level does not exist.
    pub fn level(&self, ln: usize) -> &PatchLevel {
        self.levels
            .get(ln)
            .unwrap_or_else(|| panic!("level {} does not exist", ln))
    }

    pub fn level_mut(&mut self, ln: usize) -> &mut PatchLevel {
        self.levels
            .get_mut(ln)
            .unwrap_or_else(|| panic!("level {} does not exist", ln))
    }

    pub fn get_level(&self, ln: usize) -> Option<&PatchLevel> {
        self.levels.get(ln)
    }

    pub fn levels(&self) -> &[PatchLevel] {
        &self.levels
    }

    pub(crate) fn levels_mut(&mut self) -> &mut [PatchLevel] {
        &mut self.levels
    }

    /**
     * Append a level refining the current finest level by `ratio_to_coarser`.
     * The first level must have a ratio of one on every axis. `owners[i]` is
     * the rank holding the data of `boxes[i]`. Returns the new level number.
     */
    pub fn make_level(&mut self, boxes: Vec<IndexSpace>, owners: Vec<usize>, ratio_to_coarser: IntVector) -> Result<usize, Error> {
        let ln = self.levels.len();
        self.validate_level(ln, &boxes, &owners, &ratio_to_coarser)?;

        let ratio_to_level_zero = match self.levels.last() {
            Some(coarser) => coarser.ratio_to_level_zero() * ratio_to_coarser,
            None => ratio_to_coarser,
        };
        info!("rank {}: create level {} with {} patches (ratio {})", self.rank, ln, boxes.len(), ratio_to_coarser);

        self.levels.push(PatchLevel::new(
            ln,
            ratio_to_coarser,
            ratio_to_level_zero,
            boxes,
            owners,
            self.rank,
            &self.descriptor));
        Ok(ln)
    }

    /**
     * Replace the boxes of an existing level, keeping its refinement ratio.
     * Data on the replaced level is discarded. Finer levels are kept as they
     * are; the caller must re-validate or remove them, and must reset the
     * level range of any hierarchy-wide operators bound to this hierarchy.
     */
    pub fn reset_level(&mut self, ln: usize, boxes: Vec<IndexSpace>, owners: Vec<usize>) -> Result<(), Error> {
        let ratio = self.levels.get(ln).ok_or(Error::NoSuchLevel(ln))?.ratio_to_coarser();
        let ratio_to_level_zero = self.levels[ln].ratio_to_level_zero();
        self.validate_level(ln, &boxes, &owners, &ratio)?;

        info!("rank {}: replace level {} with {} patches", self.rank, ln, boxes.len());

        self.levels[ln] = PatchLevel::new(
            ln,
            ratio,
            ratio_to_level_zero,
            boxes,
            owners,
            self.rank,
            &self.descriptor);
        Ok(())
    }

    /**
     * Drop every level finer than `ln`.
     */
    pub fn remove_finer_levels(&mut self, ln: usize) {
        if self.levels.len() > ln + 1 {
            info!("rank {}: remove levels {}..{}", self.rank, ln + 1, self.levels.len());
            self.levels.truncate(ln + 1)
        }
    }

    fn validate_level(&self, ln: usize, boxes: &[IndexSpace], owners: &[usize], ratio: &IntVector) -> Result<(), Error> {
        if ratio.dim() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, found: ratio.dim() })
        }
        if ratio.min_component() < 1 || (ln == 0 && *ratio != IntVector::one(self.dim)) {
            return Err(Error::InvalidRatio { level: ln, ratio: *ratio })
        }
        if boxes.len() != owners.len() {
            return Err(Error::OwnerCountMismatch { level: ln, boxes: boxes.len(), owners: owners.len() })
        }
        if let Some(&owner) = owners.iter().find(|&&o| o >= self.num_ranks) {
            return Err(Error::OwnerOutOfRange { level: ln, owner, num_ranks: self.num_ranks })
        }
        for space in boxes {
            if space.dim() != self.dim {
                return Err(Error::DimensionMismatch { expected: self.dim, found: space.dim() })
            }
            if space.is_empty() {
                return Err(Error::EmptyPatch { level: ln, space: *space })
            }
        }
        for (i, a) in boxes.iter().enumerate() {
            if let Some(b) = boxes[i + 1..].iter().find(|b| a.intersects(b)) {
                return Err(Error::OverlappingPatches { level: ln, first: *a, second: *b })
            }
        }
        if ln > 0 {
            let coarser = self.levels[ln - 1].boxes();

            for space in boxes {
                let mut outside = BoxContainer::single(space.coarsen(ratio));
                outside.remove_intersections(coarser);

                if !outside.is_empty() {
                    return Err(Error::ImproperNesting { level: ln, space: *space })
                }
            }
        }
        Ok(())
    }
}
