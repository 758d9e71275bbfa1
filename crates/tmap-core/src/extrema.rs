use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use tmap_model::{AttrValue, FieldType, Layer, format_double};

use crate::error::{Result, SchemaError};
use crate::join::ParseFailure;
use crate::schema::ensure_fields;

/// Max and min of one group, with the join keys that carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremaRecord {
    pub max_key: String,
    pub max_value: f64,
    pub min_key: String,
    pub min_value: f64,
}

/// Per-field, per-group extrema plus the coercion failures encountered on
/// the way. Failed features are excluded from their group, never counted
/// as zero.
#[derive(Debug, Clone, Serialize)]
pub struct ExtremaReport {
    pub extrema: BTreeMap<String, BTreeMap<String, ExtremaRecord>>,
    pub failures: Vec<ParseFailure>,
}

/// How an extremum is rendered into its label field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelFormat {
    /// The bare number.
    Raw,
    /// Integer percentage: `round(x * 100)` with a `%` suffix.
    Percent,
    /// Two decimal places.
    Fixed2,
    /// Three decimal places.
    Fixed3,
}

pub fn format_label(value: f64, format: LabelFormat) -> String {
    match format {
        LabelFormat::Raw => format_double(value),
        LabelFormat::Percent => format!("{}%", (value * 100.0).round() as i64),
        LabelFormat::Fixed2 => format!("{value:.2}"),
        LabelFormat::Fixed3 => format!("{value:.3}"),
    }
}

fn require_field<L: Layer>(layer: &L, field: &str) -> Result<()> {
    if layer.has_field(field) {
        Ok(())
    } else {
        Err(SchemaError::MissingField {
            field: field.to_string(),
        }
        .into())
    }
}

fn key_of<L: Layer>(layer: &L, id: tmap_model::FeatureId, field: &str) -> Result<String> {
    match layer.value(id, field)? {
        AttrValue::Null => Err(SchemaError::MissingKeyValue {
            feature: id,
            field: field.to_string(),
        }
        .into()),
        other => Ok(other.render()),
    }
}

/// Computes per-group max/min for each value field.
///
/// One forward pass per value field collects `(group, join key, value)`
/// triples into an explicit multi-map; grouping never depends on input
/// order. Sentinel values are excluded per group; a group with nothing left
/// contributes no record, and a single survivor is both max and min. Ties
/// go to the first-encountered join key in layer iteration order, so the
/// result is deterministic.
///
/// A missing group or join-key field, or a feature with no value for one,
/// aborts the whole computation before anything is written.
pub fn compute_group_extrema<L: Layer>(
    layer: &L,
    join_key_field: &str,
    group_by_field: &str,
    value_fields: &[String],
    sentinel: f64,
) -> Result<ExtremaReport> {
    require_field(layer, join_key_field)?;
    require_field(layer, group_by_field)?;
    for field in value_fields {
        require_field(layer, field)?;
    }

    let ids = layer.feature_ids();
    let mut extrema: BTreeMap<String, BTreeMap<String, ExtremaRecord>> = BTreeMap::new();
    let mut failures: Vec<ParseFailure> = Vec::new();

    for field in value_fields {
        let mut groups: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
        for &id in &ids {
            let group = key_of(layer, id, group_by_field)?;
            let join_key = key_of(layer, id, join_key_field)?;
            let raw = layer.value(id, field)?;
            let Some(value) = raw.as_f64() else {
                failures.push(ParseFailure {
                    feature: id,
                    field: field.clone(),
                    raw: raw.render(),
                });
                continue;
            };
            groups.entry(group).or_default().push((join_key, value));
        }

        let mut field_records: BTreeMap<String, ExtremaRecord> = BTreeMap::new();
        for (group, members) in groups {
            let mut survivors = members.iter().filter(|(_, v)| *v != sentinel);
            let Some((first_key, first_value)) = survivors.next() else {
                debug!(field = %field, group = %group, "group has only sentinel values");
                continue;
            };
            let mut record = ExtremaRecord {
                max_key: first_key.clone(),
                max_value: *first_value,
                min_key: first_key.clone(),
                min_value: *first_value,
            };
            for (key, value) in survivors {
                if *value > record.max_value {
                    record.max_key = key.clone();
                    record.max_value = *value;
                }
                if *value < record.min_value {
                    record.min_key = key.clone();
                    record.min_value = *value;
                }
            }
            field_records.insert(group, record);
        }
        info!(field = %field, groups = field_records.len(), "computed group extrema");
        extrema.insert(field.clone(), field_records);
    }

    Ok(ExtremaReport { extrema, failures })
}

/// Physical label-field name for a value field: `L_` plus the first eight
/// characters, then the layer format's own truncation.
fn label_field_name(value_field: &str) -> String {
    let prefix: String = value_field.chars().take(8).collect();
    format!("L_{prefix}")
}

/// Writes the formatted extrema back as label fields.
///
/// Every feature's group and join key is read up front; a feature missing
/// either aborts before any field is provisioned or any value written. Then
/// for each value field a text field named `L_<field[..8]>` is provisioned
/// through the schema manager (so prefix collisions are reported, not
/// silently merged), and every feature holding a group's max key gets the
/// formatted max value and every feature holding the min key gets the min.
/// A feature carrying both, as in a single-member group, is written once.
///
/// Returns the physical label-field names in value-field order.
pub fn apply_extrema_labels<L: Layer>(
    layer: &mut L,
    join_key_field: &str,
    group_by_field: &str,
    report: &ExtremaReport,
    format: LabelFormat,
) -> Result<Vec<String>> {
    require_field(layer, join_key_field)?;
    require_field(layer, group_by_field)?;

    let ids = layer.feature_ids();
    let mut keys: Vec<(String, String)> = Vec::with_capacity(ids.len());
    for &id in &ids {
        let group = key_of(layer, id, group_by_field)?;
        let join_key = key_of(layer, id, join_key_field)?;
        keys.push((group, join_key));
    }

    let value_fields: Vec<&String> = report.extrema.keys().collect();
    let label_names: Vec<String> = value_fields
        .iter()
        .map(|field| label_field_name(field))
        .collect();
    let applied = ensure_fields(layer, &label_names, FieldType::Text)?;

    for (field, label) in value_fields.iter().zip(&applied) {
        let Some(records) = report.extrema.get(*field) else {
            continue;
        };
        for (&id, (group, join_key)) in ids.iter().zip(&keys) {
            let Some(record) = records.get(group) else {
                continue;
            };
            if *join_key == record.max_key {
                layer.set_value(id, label, AttrValue::Text(format_label(record.max_value, format)))?;
            } else if *join_key == record.min_key {
                layer.set_value(id, label, AttrValue::Text(format_label(record.min_value, format)))?;
            }
        }
    }
    Ok(applied)
}
