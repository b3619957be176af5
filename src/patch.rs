use serde::{Deserialize, Serialize};
use crate::descriptor::{DataId, PatchDescriptor};
use crate::index_space::IndexSpace;
use crate::patch_data::{PatchArray, PatchData};
use crate::scalar::Scalar;




/**
 * Identifies a patch by its level number and its position in the level's
 * global box list.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatchId {
    pub level: usize,
    pub index: usize,
}




/**
 * A patch is a rectangular block of cells on one refinement level, together
 * with one data array per registered variable. The data list is indexed by
 * `DataId`, so the arrays stay relocatable and serializable.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    id: PatchId,
    space: IndexSpace,
    owner: usize,
    data: Vec<PatchData>,
}




// ============================================================================
impl Patch {

    /**
     * Generate a patch covering the given cell box, with zero-initialized
     * data for every variable in the descriptor.
     */
    pub fn new(id: PatchId, space: IndexSpace, owner: usize, descriptor: &PatchDescriptor) -> Self {
        Self {
            id,
            space,
            owner,
            data: descriptor.iter().map(|(_, info)| info.allocate(space)).collect(),
        }
    }

    pub fn id(&self) -> PatchId {
        self.id
    }

    /// The patch interior, in cell indexes of its level.
    pub fn index_space(&self) -> &IndexSpace {
        &self.space
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    pub fn num_data(&self) -> usize {
        self.data.len()
    }

    /// Type-erased access to the data of a variable. Panics on an unknown id.
    pub fn patch_data(&self, id: DataId) -> &PatchData {
        self.data
            .get(id.0)
            .unwrap_or_else(|| panic!("patch {:?} has no data {}", self.id, id))
    }

    pub fn patch_data_mut(&mut self, id: DataId) -> &mut PatchData {
        let pid = self.id;
        self.data
            .get_mut(id.0)
            .unwrap_or_else(|| panic!("patch {:?} has no data {}", pid, id))
    }

    /// Typed access to the data of a variable, or `None` if the id is
    /// unknown or holds another element type.
    pub fn data<T: Scalar>(&self, id: DataId) -> Option<&PatchArray<T>> {
        self.data.get(id.0).and_then(T::unwrap_ref)
    }

    pub fn data_mut<T: Scalar>(&mut self, id: DataId) -> Option<&mut PatchArray<T>> {
        self.data.get_mut(id.0).and_then(T::unwrap_mut)
    }

    /**
     * Borrow two distinct variables mutably at once. Returns `None` if either
     * id is unknown or holds another element type. Panics if `a == b`.
     */
    pub fn data_pair_mut<T: Scalar>(&mut self, a: DataId, b: DataId) -> Option<(&mut PatchArray<T>, &mut PatchArray<T>)> {
        assert_ne!(a, b, "cannot borrow data {} twice", a);

        if a.0 >= self.data.len() || b.0 >= self.data.len() {
            return None
        }
        let (lo, hi) = (a.0.min(b.0), a.0.max(b.0));
        let (head, tail) = self.data.split_at_mut(hi);
        let (x, y) = (T::unwrap_mut(&mut head[lo])?, T::unwrap_mut(&mut tail[0])?);

        if a.0 < b.0 {
            Some((x, y))
        } else {
            Some((y, x))
        }
    }

    /**
     * Borrow a destination variable mutably, along with read access to a set
     * of source variables. A source equal to the destination comes back as
     * `None`, since it can only be read through the destination borrow.
     */
    pub fn split_data<const N: usize>(&mut self, dst: DataId, sources: [DataId; N]) -> (&mut PatchData, [Option<&PatchData>; N]) {
        let pid = self.id;
        let (head, rest) = self.data.split_at_mut(dst.0);
        let (target, tail) = rest
            .split_first_mut()
            .unwrap_or_else(|| panic!("patch {:?} has no data {}", pid, dst));
        let head: &[PatchData] = head;
        let tail: &[PatchData] = tail;

        let sources = sources.map(move |id| {
            if id.0 < dst.0 {
                Some(&head[id.0])
            } else if id.0 > dst.0 {
                Some(tail.get(id.0 - dst.0 - 1).unwrap_or_else(|| panic!("patch {:?} has no data {}", pid, id)))
            } else {
                None
            }
        });
        (target, sources)
    }

    /**
     * Exchange the contents of two variables with the same layout. Panics if
     * the variables differ in element type, centering, depth, or ghost width.
     */
    pub fn swap_data(&mut self, a: DataId, b: DataId) {
        if a == b {
            return
        }
        let pid = self.id;
        let (lo, hi) = (a.0.min(b.0), a.0.max(b.0));
        assert!(hi < self.data.len(), "patch {:?} has no data {}", pid, DataId(hi));

        let (head, tail) = self.data.split_at_mut(hi);

        match (&mut head[lo], &mut tail[0]) {
            (PatchData::Int(x), PatchData::Int(y)) => x.swap(y),
            (PatchData::Float(x), PatchData::Float(y)) => x.swap(y),
            (PatchData::Double(x), PatchData::Double(y)) => x.swap(y),
            (PatchData::Complex(x), PatchData::Complex(y)) => x.swap(y),
            (x, y) => panic!("cannot swap {:?} data with {:?} data", x.element_type(), y.element_type()),
        }
    }
}
