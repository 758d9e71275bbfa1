use std::path::Path;

use tracing::debug;

use tmap_model::{AttrValue, FieldDef, FieldType, Layer, LayerFormatCapabilities, MemoryLayer};

use crate::error::Result;
use crate::source::read_source;
use crate::writeback::write_delimited;

/// Loads a delimited attribute table as an in-memory layer.
///
/// Every column comes in text-typed; the schema manager retypes columns that
/// the pipeline provisions later. Empty cells load as `Null`. Header names
/// are taken verbatim; exports from legacy vector formats already satisfy
/// the 10-character limit.
pub fn load_attribute_table(
    path: &Path,
    delimiter: u8,
    capabilities: LayerFormatCapabilities,
) -> Result<MemoryLayer> {
    let table = read_source(path, delimiter)?;
    let fields: Vec<FieldDef> = table
        .header
        .iter()
        .map(|name| FieldDef::new(name.clone(), FieldType::Text))
        .collect();
    let mut layer = MemoryLayer::with_fields(capabilities, fields);
    for row in &table.rows {
        let values = table.header.iter().zip(row).map(|(name, cell)| {
            let value = if cell.is_empty() {
                AttrValue::Null
            } else {
                AttrValue::Text(cell.clone())
            };
            (name.as_str(), value)
        });
        // Row width already validated against the header by the reader.
        layer.push_feature(values)?;
    }
    debug!(path = %path.display(), features = layer.feature_count(), "loaded attribute table");
    Ok(layer)
}

/// Writes a layer's attribute table back to a delimited file, one column per
/// field in declaration order. `Null` serializes as an empty cell. The file
/// is staged and renamed into place, so a failed write leaves an existing
/// table untouched.
pub fn write_attribute_table<L: Layer>(layer: &L, path: &Path, delimiter: u8) -> Result<()> {
    let fields = layer.fields();
    let header: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
    let mut rows = Vec::with_capacity(layer.feature_count());
    for id in layer.feature_ids() {
        let mut row = Vec::with_capacity(fields.len());
        for field in &fields {
            row.push(layer.value(id, &field.name)?.render());
        }
        rows.push(row);
    }
    write_delimited(path, delimiter, &header, &rows)?;
    debug!(path = %path.display(), "wrote attribute table");
    Ok(())
}
