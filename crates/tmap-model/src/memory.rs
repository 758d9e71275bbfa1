use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::field::{FieldDef, LayerFormatCapabilities};
use crate::layer::{FeatureId, Layer};
use crate::value::AttrValue;

/// In-memory feature collection.
///
/// Backs the CLI's attribute-table workflow and the test suites. Insertion
/// order of features is the iteration order.
#[derive(Debug, Clone)]
pub struct MemoryLayer {
    capabilities: LayerFormatCapabilities,
    fields: Vec<FieldDef>,
    features: Vec<MemoryFeature>,
    next_id: u64,
}

#[derive(Debug, Clone)]
struct MemoryFeature {
    id: FeatureId,
    values: BTreeMap<String, AttrValue>,
}

impl MemoryLayer {
    pub fn new(capabilities: LayerFormatCapabilities) -> Self {
        Self {
            capabilities,
            fields: Vec::new(),
            features: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_fields(capabilities: LayerFormatCapabilities, fields: Vec<FieldDef>) -> Self {
        let mut layer = Self::new(capabilities);
        layer.fields = fields;
        layer
    }

    /// Appends a feature populated from `(field, value)` pairs. Fields not
    /// mentioned are set to `Null`; an undeclared field name is an error.
    pub fn push_feature<'a, I>(&mut self, values: I) -> Result<FeatureId>
    where
        I: IntoIterator<Item = (&'a str, AttrValue)>,
    {
        let mut cells: BTreeMap<String, AttrValue> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), AttrValue::Null))
            .collect();
        for (name, value) in values {
            if !cells.contains_key(name) {
                return Err(ModelError::UnknownField(name.to_string()));
            }
            cells.insert(name.to_string(), value);
        }
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        self.features.push(MemoryFeature { id, values: cells });
        Ok(id)
    }

    fn feature(&self, id: FeatureId) -> Result<&MemoryFeature> {
        self.features
            .iter()
            .find(|f| f.id == id)
            .ok_or(ModelError::UnknownFeature(id))
    }

    fn feature_mut(&mut self, id: FeatureId) -> Result<&mut MemoryFeature> {
        self.features
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(ModelError::UnknownFeature(id))
    }
}

impl Layer for MemoryLayer {
    fn capabilities(&self) -> LayerFormatCapabilities {
        self.capabilities
    }

    fn fields(&self) -> Vec<FieldDef> {
        self.fields.clone()
    }

    fn add_field(&mut self, field: FieldDef) -> Result<()> {
        if self.has_field(&field.name) {
            return Err(ModelError::DuplicateField(field.name));
        }
        for feature in &mut self.features {
            feature.values.insert(field.name.clone(), AttrValue::Null);
        }
        self.fields.push(field);
        Ok(())
    }

    fn delete_field(&mut self, name: &str) -> Result<()> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| ModelError::UnknownField(name.to_string()))?;
        self.fields.remove(index);
        for feature in &mut self.features {
            feature.values.remove(name);
        }
        Ok(())
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(|f| f.id).collect()
    }

    fn value(&self, id: FeatureId, field: &str) -> Result<AttrValue> {
        let feature = self.feature(id)?;
        feature
            .values
            .get(field)
            .cloned()
            .ok_or_else(|| ModelError::UnknownField(field.to_string()))
    }

    fn set_value(&mut self, id: FeatureId, field: &str, value: AttrValue) -> Result<()> {
        if !self.has_field(field) {
            return Err(ModelError::UnknownField(field.to_string()));
        }
        let feature = self.feature_mut(id)?;
        feature.values.insert(field.to_string(), value);
        Ok(())
    }
}
