#![deny(unsafe_code)]

pub mod error;
pub mod field;
pub mod layer;
pub mod memory;
pub mod value;

pub use error::ModelError;
pub use field::{FieldDef, FieldType, LayerFormatCapabilities};
pub use layer::{FeatureId, Layer};
pub use memory::MemoryLayer;
pub use value::{AttrValue, NO_DATA, format_double};
