use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::field::{FieldDef, LayerFormatCapabilities};
use crate::value::AttrValue;

/// Stable identity of a feature within its layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutable attribute store over a feature collection.
///
/// This is the seam to the external GIS layer: the pipeline only lists
/// fields, adds and deletes them, and reads or writes attribute values.
/// Features are never created or deleted through this trait, and geometry
/// is invisible to it. Implementations must keep `feature_ids` in a stable
/// order across calls; tie-breaking in the group aggregator depends on it.
pub trait Layer {
    fn capabilities(&self) -> LayerFormatCapabilities;

    fn fields(&self) -> Vec<FieldDef>;

    fn has_field(&self, name: &str) -> bool {
        self.fields().iter().any(|f| f.name == name)
    }

    /// Declares a new field. Fails if the name is already declared;
    /// replace semantics belong to the schema manager, not the store.
    fn add_field(&mut self, field: FieldDef) -> Result<()>;

    fn delete_field(&mut self, name: &str) -> Result<()>;

    fn feature_count(&self) -> usize;

    /// Feature identities in stable iteration order.
    fn feature_ids(&self) -> Vec<FeatureId>;

    fn value(&self, id: FeatureId, field: &str) -> Result<AttrValue>;

    fn set_value(&mut self, id: FeatureId, field: &str, value: AttrValue) -> Result<()>;
}
