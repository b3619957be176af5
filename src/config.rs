use serde::{Deserialize, Serialize};
use crate::descriptor::{DataId, PatchDescriptor};
use crate::error::Error;
use crate::geometry::Centering;
use crate::hierarchy::PatchHierarchy;
use crate::index_space::IndexSpace;
use crate::int_vector::{IntVector, MAX_DIM};
use crate::scalar::ElementType;




/**
 * A variable to register in the patch descriptor. The ghost width is the
 * same on every axis.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    pub centering: Centering,
    pub element: ElementType,
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default)]
    pub ghost: i64,
}

/// A patch box, with inclusive corners.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    pub lower: Vec<i64>,
    pub upper: Vec<i64>,
}

/**
 * One level of the hierarchy. The ratio defaults to one on level zero and to
 * two on every finer level. Without explicit owners, patches are dealt out
 * to the ranks round-robin.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub boxes: Vec<BoxConfig>,
    #[serde(default)]
    pub ratio: Option<Vec<i64>>,
    #[serde(default)]
    pub owners: Option<Vec<usize>>,
}

/**
 * A declarative description of a patch hierarchy and the variables living on
 * it. The same configuration, built on every rank of a group, yields
 * consistent views of one distributed hierarchy.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub dim: usize,
    pub variables: Vec<VariableConfig>,
    pub levels: Vec<LevelConfig>,
}

fn default_depth() -> usize {
    1
}




// ============================================================================
impl BoxConfig {
    pub fn from_space(space: &IndexSpace) -> Self {
        Self {
            lower: space.lower().as_slice().to_vec(),
            upper: space.upper().as_slice().to_vec(),
        }
    }

    fn to_space(&self, dim: usize) -> Result<IndexSpace, Error> {
        let lower = vector(&self.lower, dim)?;
        let upper = vector(&self.upper, dim)?;
        Ok(IndexSpace::new(lower, upper))
    }
}

fn vector(components: &[i64], dim: usize) -> Result<IntVector, Error> {
    if components.len() != dim {
        return Err(Error::DimensionMismatch { expected: dim, found: components.len() })
    }
    Ok(IntVector::new(components))
}




// ============================================================================
impl HierarchyConfig {

    /**
     * A weak-scaling layout: each of `num_ranks` ranks owns
     * `patches_per_rank` cubic patches of `patch_size` cells on a side, laid
     * out in a row along axis zero. With `refined`, a level at ratio two
     * covers the lower half of the row, owned like the patches it refines.
     */
    pub fn uniform(
        dim: usize,
        patch_size: i64,
        patches_per_rank: usize,
        num_ranks: usize,
        refined: bool,
        variables: Vec<VariableConfig>) -> Self
    {
        let total = patches_per_rank * num_ranks;
        let coarse: Vec<_> = (0..total)
            .map(|i| {
                let mut lower = vec![0; dim];
                let mut upper = vec![patch_size - 1; dim];
                lower[0] = i as i64 * patch_size;
                upper[0] = (i as i64 + 1) * patch_size - 1;
                BoxConfig { lower, upper }
            })
            .collect();
        let owners: Vec<_> = (0..total).map(|i| i / patches_per_rank.max(1)).collect();

        let mut levels = vec![LevelConfig {
            boxes: coarse.clone(),
            ratio: None,
            owners: Some(owners.clone()),
        }];

        if refined {
            let half = (total + 1) / 2;
            let ratio = IntVector::uniform(dim, 2);
            let boxes = coarse[..half]
                .iter()
                .map(|b| {
                    let space = IndexSpace::new(IntVector::new(&b.lower), IntVector::new(&b.upper));
                    BoxConfig::from_space(&space.refine(&ratio))
                })
                .collect();
            levels.push(LevelConfig {
                boxes,
                ratio: Some(vec![2; dim]),
                owners: Some(owners[..half].to_vec()),
            })
        }
        Self { dim, variables, levels }
    }

    /**
     * Register the variables and create the levels, as seen from `rank` of
     * a group of `num_ranks`. Returns the hierarchy and the variable ids in
     * configuration order.
     */
    pub fn build(&self, rank: usize, num_ranks: usize) -> Result<(PatchHierarchy, Vec<DataId>), Error> {
        if self.dim == 0 || self.dim > MAX_DIM {
            return Err(Error::UnsupportedDimension(self.dim))
        }
        let mut descriptor = PatchDescriptor::new();

        let ids = self
            .variables
            .iter()
            .map(|v| descriptor.define_untyped(&v.name, v.centering, v.element, v.depth, IntVector::uniform(self.dim, v.ghost)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut hierarchy = PatchHierarchy::new(self.dim, descriptor, rank, num_ranks)?;

        for (ln, level) in self.levels.iter().enumerate() {
            let boxes = level
                .boxes
                .iter()
                .map(|b| b.to_space(self.dim))
                .collect::<Result<Vec<_>, _>>()?;
            let owners = match &level.owners {
                Some(owners) => owners.clone(),
                None => (0..boxes.len()).map(|i| i % num_ranks).collect(),
            };
            let ratio = match &level.ratio {
                Some(r) => vector(r, self.dim)?,
                None if ln == 0 => IntVector::one(self.dim),
                None => IntVector::uniform(self.dim, 2),
            };
            hierarchy.make_level(boxes, owners, ratio)?;
        }
        Ok((hierarchy, ids))
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{BoxConfig, HierarchyConfig, LevelConfig, VariableConfig};
    use crate::error::Error;
    use crate::geometry::Centering;
    use crate::index_space::range2d;
    use crate::scalar::ElementType;

    fn density() -> VariableConfig {
        VariableConfig {
            name: "density".to_string(),
            centering: Centering::Cell,
            element: ElementType::Double,
            depth: 1,
            ghost: 2,
        }
    }

    #[test]
    fn uniform_layout_gives_each_rank_its_patches() {
        let config = HierarchyConfig::uniform(2, 8, 3, 2, true, vec![density()]);
        let (h, ids) = config.build(1, 2).unwrap();

        assert_eq!(ids.len(), 1);
        assert_eq!(h.number_of_levels(), 2);
        assert_eq!(h.level(0).number_of_patches(), 6);
        assert_eq!(h.level(0).local_patch_count(), 3);
        assert_eq!(h.level(0).boxes()[5], range2d(40..48, 0..8));
        assert_eq!(h.level(1).boxes()[0], range2d(0..16, 0..16));
        assert_eq!(h.level(1).number_of_patches(), 3);
        assert_eq!(h.level(1).local_patch_count(), 0);
    }

    #[test]
    fn owners_default_to_round_robin() {
        let config = HierarchyConfig {
            dim: 2,
            variables: vec![density()],
            levels: vec![LevelConfig {
                boxes: vec![
                    BoxConfig { lower: vec![0, 0], upper: vec![3, 3] },
                    BoxConfig { lower: vec![4, 0], upper: vec![7, 3] },
                    BoxConfig { lower: vec![8, 0], upper: vec![11, 3] },
                ],
                ratio: None,
                owners: None,
            }],
        };
        let (h, _) = config.build(0, 2).unwrap();
        assert_eq!(h.level(0).owners(), &[0, 1, 0]);
        assert_eq!(h.level(0).local_patch_count(), 2);
    }

    #[test]
    fn malformed_configurations_are_rejected() {
        let mut config = HierarchyConfig::uniform(2, 4, 1, 1, false, vec![density(), density()]);
        assert_eq!(config.build(0, 1).err(), Some(Error::DuplicateVariable("density".to_string())));

        config.variables.pop();
        config.levels[0].boxes[0].upper.push(3);
        assert_eq!(config.build(0, 1).err(), Some(Error::DimensionMismatch { expected: 2, found: 3 }));

        config.dim = 4;
        assert_eq!(config.build(0, 1).err(), Some(Error::UnsupportedDimension(4)));
    }
}
