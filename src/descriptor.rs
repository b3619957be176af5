use core::fmt;
use serde::{Deserialize, Serialize};
use crate::error::Error;
use crate::geometry::Centering;
use crate::index_space::IndexSpace;
use crate::int_vector::IntVector;
use crate::patch_data::PatchData;
use crate::scalar::{ElementType, Scalar};




/**
 * Identifies a registered variable. The id is a dense index into the
 * descriptor's registry and into each patch's data list.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataId(pub usize);

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}




/**
 * Static metadata of a registered variable, available without a live patch.
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    pub centering: Centering,
    pub element: ElementType,
    pub depth: usize,
    pub ghost: IntVector,
}




// ============================================================================
impl VariableInfo {

    /// Allocate zero-initialized data for this variable over a patch box.
    pub fn allocate(&self, cell_box: IndexSpace) -> PatchData {
        PatchData::allocate(self.element, self.centering, cell_box, self.ghost, self.depth)
    }
}




/**
 * The registry of variables which every patch of a hierarchy carries.
 */
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDescriptor {
    variables: Vec<VariableInfo>,
}




// ============================================================================
impl PatchDescriptor {

    pub fn new() -> Self {
        Self::default()
    }

    /**
     * Register a variable with element type `T`. Ids are assigned in
     * definition order. Names must be unique and the depth at least one.
     */
    pub fn define<T: Scalar>(
        &mut self,
        name: &str,
        centering: Centering,
        depth: usize,
        ghost: IntVector) -> Result<DataId, Error>
    {
        self.define_untyped(name, centering, T::ELEMENT, depth, ghost)
    }

    /**
     * Register a variable whose element type is only known at run time.
     */
    pub fn define_untyped(
        &mut self,
        name: &str,
        centering: Centering,
        element: ElementType,
        depth: usize,
        ghost: IntVector) -> Result<DataId, Error>
    {
        if self.lookup(name).is_some() {
            return Err(Error::DuplicateVariable(name.to_string()))
        }
        if depth == 0 {
            return Err(Error::ZeroDepth(name.to_string()))
        }
        if ghost.min_component() < 0 {
            return Err(Error::NegativeGhostWidth(name.to_string()))
        }
        self.variables.push(VariableInfo {
            name: name.to_string(),
            centering,
            element,
            depth,
            ghost,
        });
        Ok(DataId(self.variables.len() - 1))
    }

    pub fn lookup(&self, name: &str) -> Option<DataId> {
        self.variables.iter().position(|v| v.name == name).map(DataId)
    }

    /**
     * Resolve an id to its metadata. Panics if the id was not issued by this
     * descriptor.
     */
    pub fn info(&self, id: DataId) -> &VariableInfo {
        self.variables
            .get(id.0)
            .unwrap_or_else(|| panic!("data id {} is not registered", id))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DataId, &VariableInfo)> {
        self.variables.iter().enumerate().map(|(i, v)| (DataId(i), v))
    }
}
