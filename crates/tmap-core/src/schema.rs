use std::collections::BTreeMap;

use tracing::debug;

use tmap_model::{FieldDef, FieldType, Layer};

use crate::error::{Result, SchemaError};

/// Provisions one field per requested name, returning the physical names
/// actually applied, in request order.
///
/// Names are truncated to the layer format's limit *before* any existence
/// check. Two requested names that collapse to the same physical name are a
/// reported collision, never a silent last-one-wins. An existing field with
/// a requested name is dropped and recreated with the requested type, which
/// makes the whole step idempotent.
pub fn ensure_fields<L: Layer>(
    layer: &mut L,
    names: &[String],
    field_type: FieldType,
) -> Result<Vec<String>> {
    let capabilities = layer.capabilities();
    let mut physical: Vec<String> = Vec::with_capacity(names.len());
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for name in names {
        if name.is_empty() {
            return Err(SchemaError::EmptyName.into());
        }
        if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Err(SchemaError::NameStartsWithDigit { name: name.clone() }.into());
        }
        let truncated = capabilities.truncate_name(name);
        if let Some(earlier) = seen.insert(truncated.clone(), name) {
            return Err(SchemaError::TruncationCollision {
                first: earlier.to_string(),
                second: name.clone(),
                physical: truncated,
            }
            .into());
        }
        physical.push(truncated);
    }

    for name in &physical {
        if layer.has_field(name) {
            debug!(field = %name, "replacing existing field");
            layer.delete_field(name)?;
        }
        layer.add_field(FieldDef::new(name.clone(), field_type))?;
        debug!(field = %name, ?field_type, "added field");
    }
    Ok(physical)
}

/// Deletes each named field if present, after the same truncation the add
/// path applies. Absent fields are skipped.
pub fn remove_fields<L: Layer>(layer: &mut L, names: &[String]) -> Result<()> {
    let capabilities = layer.capabilities();
    for name in names {
        let physical = capabilities.truncate_name(name);
        if layer.has_field(&physical) {
            layer.delete_field(&physical)?;
            debug!(field = %physical, "deleted field");
        } else {
            debug!(field = %physical, "no field to delete");
        }
    }
    Ok(())
}
