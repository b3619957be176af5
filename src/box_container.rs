use core::iter::FromIterator;
use serde::{Deserialize, Serialize};
use crate::index_space::IndexSpace;
use crate::int_vector::IntVector;




/**
 * An ordered list of index spaces. The container does not by itself guarantee
 * that its members are disjoint; the algebra functions document which of
 * their outputs are.
 */
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxContainer {
    boxes: Vec<IndexSpace>,
}




// ============================================================================
impl BoxContainer {

    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Create a container holding the single given box, or nothing if the
    /// box is empty.
    pub fn single(space: IndexSpace) -> Self {
        let mut result = Self::new();
        result.push(space);
        result
    }

    /// Append a box, unless it is empty.
    pub fn push(&mut self, space: IndexSpace) {
        if !space.is_empty() {
            self.boxes.push(space)
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexSpace> {
        self.boxes.iter()
    }

    pub fn as_slice(&self) -> &[IndexSpace] {
        &self.boxes
    }

    /**
     * Return the total number of indexes in all members. For a container of
     * disjoint boxes this is the volume of the covered region.
     */
    pub fn total_len(&self) -> usize {
        self.boxes.iter().map(IndexSpace::len).sum()
    }

    pub fn contains(&self, index: &IntVector) -> bool {
        self.boxes.iter().any(|b| b.contains(index))
    }

    pub fn intersects(&self, space: &IndexSpace) -> bool {
        self.boxes.iter().any(|b| b.intersects(space))
    }

    /**
     * Determine whether no two members overlap.
     */
    pub fn is_disjoint(&self) -> bool {
        self.boxes
            .iter()
            .enumerate()
            .all(|(i, a)| self.boxes[i + 1..].iter().all(|b| !a.intersects(b)))
    }

    /**
     * Determine whether the union of the members covers the given index
     * space.
     */
    pub fn covers(&self, space: &IndexSpace) -> bool {
        let mut rest = Self::single(*space);
        rest.remove_intersections(self.as_slice());
        rest.is_empty()
    }

    /**
     * Remove from the members every index contained in `space`. Members which
     * are partially covered are split into disjoint pieces. If the members
     * were disjoint beforehand, they remain so.
     */
    pub fn remove_intersections_with(&mut self, space: &IndexSpace) {
        if !self.intersects(space) {
            return;
        }
        self.boxes = self.boxes.iter().flat_map(|b| b.remove(space)).collect();
    }

    /**
     * Remove from the members every index contained in any of the given
     * index spaces.
     */
    pub fn remove_intersections(&mut self, spaces: &[IndexSpace]) {
        for space in spaces {
            if self.is_empty() {
                break;
            }
            self.remove_intersections_with(space)
        }
    }

    pub fn refine(&self, ratio: &IntVector) -> Self {
        self.boxes.iter().map(|b| b.refine(ratio)).collect()
    }

    pub fn coarsen(&self, ratio: &IntVector) -> Self {
        self.boxes.iter().map(|b| b.coarsen(ratio)).collect()
    }

    /**
     * Merge pairs of members whose union is itself a box, until no such pair
     * remains. The covered region does not change.
     */
    pub fn coalesce(&mut self) {
        let mut merged = true;

        while merged {
            merged = false;

            'search: for i in 0..self.boxes.len() {
                for j in i + 1..self.boxes.len() {
                    if let Some(union) = box_union(&self.boxes[i], &self.boxes[j]) {
                        self.boxes[i] = union;
                        self.boxes.remove(j);
                        merged = true;
                        break 'search;
                    }
                }
            }
        }
    }
}




/**
 * Return the union of two boxes if it is a box: the two must agree on every
 * axis but one, and on that axis they must touch or overlap.
 */
fn box_union(a: &IndexSpace, b: &IndexSpace) -> Option<IndexSpace> {
    let (al, au, bl, bu) = (a.lower(), a.upper(), b.lower(), b.upper());
    let differing: Vec<_> = (0..a.dim())
        .filter(|&d| al[d] != bl[d] || au[d] != bu[d])
        .collect();

    match differing.as_slice() {
        [] => Some(*a),
        [d] if au[*d] + 1 >= bl[*d] && bu[*d] + 1 >= al[*d] => {
            Some(IndexSpace::new(al.min(&bl), au.max(&bu)))
        }
        _ => None,
    }
}




/**
 * Decompose a list of possibly overlapping boxes into one container per input
 * box, such that the containers are pairwise disjoint and their union equals
 * the union of the inputs. Boxes are processed in the given order: each box
 * keeps the part of itself not already covered by the boxes before it. The
 * result is therefore a deterministic function of the input order.
 */
pub fn make_non_overlapping(boxes: &[IndexSpace]) -> Vec<BoxContainer> {
    boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let mut pieces = BoxContainer::single(*b);
            pieces.remove_intersections(&boxes[..i]);
            pieces
        })
        .collect()
}




/**
 * Return the pairwise intersections of two box lists, skipping the empty ones.
 */
pub fn intersect_boxes(a: &[IndexSpace], b: &[IndexSpace]) -> BoxContainer {
    a.iter()
        .flat_map(|x| b.iter().map(move |y| x.intersect(y)))
        .collect()
}




// ============================================================================
impl FromIterator<IndexSpace> for BoxContainer {
    fn from_iter<I: IntoIterator<Item = IndexSpace>>(iter: I) -> Self {
        let mut result = Self::new();

        for space in iter {
            result.push(space)
        }
        result
    }
}

impl From<Vec<IndexSpace>> for BoxContainer {
    fn from(boxes: Vec<IndexSpace>) -> Self {
        boxes.into_iter().collect()
    }
}

impl IntoIterator for BoxContainer {
    type Item = IndexSpace;
    type IntoIter = std::vec::IntoIter<IndexSpace>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.into_iter()
    }
}

impl<'a> IntoIterator for &'a BoxContainer {
    type Item = &'a IndexSpace;
    type IntoIter = std::slice::Iter<'a, IndexSpace>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}
