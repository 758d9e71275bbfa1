use serde::{Deserialize, Serialize};

/// Declared type of an attribute field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Double,
    Text,
    Date,
}

/// A named, typed attribute slot on a feature collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
        }
    }
}

/// Name-length rules of the backing format, stated explicitly instead of
/// being sniffed from a path suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerFormatCapabilities {
    /// Maximum physical field-name length, `None` when unconstrained.
    pub max_field_name_length: Option<usize>,
}

impl LayerFormatCapabilities {
    /// Legacy vector format profile: 10-character field names.
    pub fn shapefile() -> Self {
        Self {
            max_field_name_length: Some(10),
        }
    }

    /// Table-backed store profile: unconstrained names.
    pub fn table() -> Self {
        Self {
            max_field_name_length: None,
        }
    }

    /// Physical name for a requested field name under this format.
    pub fn truncate_name(&self, name: &str) -> String {
        match self.max_field_name_length {
            Some(limit) => name.chars().take(limit).collect(),
            None => name.to_string(),
        }
    }
}
