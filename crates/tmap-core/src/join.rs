use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use tmap_model::{AttrValue, FeatureId, FieldType, Layer, format_double};

use crate::error::{ConfigError, Result, SchemaError};
use crate::schema::ensure_fields;

/// Configuration of one join run.
#[derive(Debug, Clone)]
pub struct JoinOptions {
    /// Source column holding the join key.
    pub key_column: usize,
    /// Layer field compared against the source key.
    pub layer_key_field: String,
    /// First value column (inclusive). Must lie after `key_column`.
    pub value_start: usize,
    /// End of the value columns (exclusive); to the end of the row when
    /// unset.
    pub value_end: Option<usize>,
    /// Type the provisioned value fields get.
    pub value_type: FieldType,
    /// When set, features with no matching source key get this value written
    /// into every provisioned field; when unset their fields are untouched.
    pub unmatched_fill: Option<f64>,
}

/// One per-feature value that failed numeric coercion. Collected, never
/// fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseFailure {
    pub feature: FeatureId,
    pub field: String,
    pub raw: String,
}

/// Outcome of a join run.
#[derive(Debug, Clone, Serialize)]
pub struct JoinReport {
    /// Physical names of the provisioned value fields, in source-column
    /// order.
    pub applied_fields: Vec<String>,
    pub matched: usize,
    pub unmatched: usize,
    pub failures: Vec<ParseFailure>,
    /// Source keys no feature consumed, sorted. Feeds the missing-key
    /// validation without a second scan.
    pub unconsumed_keys: Vec<String>,
}

fn value_range(
    header_len: usize,
    key_column: usize,
    start: usize,
    end: Option<usize>,
) -> std::result::Result<std::ops::Range<usize>, ConfigError> {
    if key_column >= header_len {
        return Err(ConfigError::KeyColumnOutOfRange {
            column: key_column,
            count: header_len,
        });
    }
    let end = end.unwrap_or(header_len);
    if start >= end {
        return Err(ConfigError::EmptyValueRange { start, end });
    }
    if end > header_len {
        return Err(ConfigError::ValueRangeOutOfRange {
            start,
            end,
            count: header_len,
        });
    }
    if start <= key_column {
        return Err(ConfigError::ValueRangeBeforeKey {
            key_column,
            start,
            end,
        });
    }
    Ok(start..end)
}

/// String form of a feature's join-key attribute. `Null` keys never match.
fn key_string(value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::Null => None,
        other => Some(other.render()),
    }
}

/// Joins source rows onto layer features by key, writing one provisioned
/// field per value column.
///
/// The source is scanned once to build the key lookup (first occurrence of a
/// key wins; later duplicates are ignored, not merged), then the layer is
/// scanned once to apply values. Feature attributes are mutated in place;
/// features are never created or deleted.
pub fn join<L: Layer>(
    layer: &mut L,
    header: &[String],
    rows: &[Vec<String>],
    options: &JoinOptions,
) -> Result<JoinReport> {
    let range = value_range(
        header.len(),
        options.key_column,
        options.value_start,
        options.value_end,
    )?;
    if !layer.has_field(&options.layer_key_field) {
        return Err(SchemaError::MissingField {
            field: options.layer_key_field.clone(),
        }
        .into());
    }

    let names: Vec<String> = header[range.clone()].to_vec();
    let applied = ensure_fields(layer, &names, options.value_type)?;

    // First occurrence wins; duplicate keys are ignored, not merged.
    let mut lookup: BTreeMap<&str, &[String]> = BTreeMap::new();
    for row in rows {
        if row.len() < range.end {
            warn!(cells = row.len(), "skipping short source row");
            continue;
        }
        let key = row[options.key_column].as_str();
        lookup.entry(key).or_insert(&row[range.clone()]);
    }
    debug!(keys = lookup.len(), "built join lookup");

    let mut consumed: BTreeSet<&str> = BTreeSet::new();
    let mut matched = 0usize;
    let mut unmatched = 0usize;
    let mut failures: Vec<ParseFailure> = Vec::new();

    for id in layer.feature_ids() {
        let key_value = layer.value(id, &options.layer_key_field)?;
        let slice = match key_string(&key_value) {
            Some(key) => match lookup.get_key_value(key.as_str()) {
                Some((stored, slice)) => {
                    consumed.insert(*stored);
                    Some(*slice)
                }
                None => None,
            },
            None => None,
        };
        match slice {
            Some(cells) => {
                matched += 1;
                for (field, cell) in applied.iter().zip(cells) {
                    let value = match options.value_type {
                        FieldType::Double => match cell.trim().parse::<f64>() {
                            Ok(parsed) => AttrValue::Double(parsed),
                            Err(_) => {
                                failures.push(ParseFailure {
                                    feature: id,
                                    field: field.clone(),
                                    raw: cell.clone(),
                                });
                                AttrValue::Null
                            }
                        },
                        FieldType::Date => {
                            match NaiveDate::parse_from_str(cell.trim(), "%Y-%m-%d") {
                                Ok(date) => AttrValue::Date(date),
                                Err(_) => {
                                    failures.push(ParseFailure {
                                        feature: id,
                                        field: field.clone(),
                                        raw: cell.clone(),
                                    });
                                    AttrValue::Null
                                }
                            }
                        }
                        FieldType::Text => AttrValue::Text(cell.clone()),
                    };
                    layer.set_value(id, field, value)?;
                }
            }
            None => {
                unmatched += 1;
                if let Some(fill) = options.unmatched_fill {
                    for field in &applied {
                        let value = match options.value_type {
                            FieldType::Double => AttrValue::Double(fill),
                            FieldType::Text => AttrValue::Text(format_double(fill)),
                            // A numeric fill has no date reading.
                            FieldType::Date => AttrValue::Null,
                        };
                        layer.set_value(id, field, value)?;
                    }
                }
            }
        }
    }

    let mut unconsumed_keys: Vec<String> = Vec::new();
    for key in lookup.keys() {
        if !consumed.contains(*key) {
            unconsumed_keys.push((*key).to_string());
        }
    }

    info!(
        matched,
        unmatched,
        failures = failures.len(),
        unconsumed = unconsumed_keys.len(),
        "join complete"
    );
    Ok(JoinReport {
        applied_fields: applied,
        matched,
        unmatched,
        failures,
        unconsumed_keys,
    })
}

/// Read-only variant of the join's missing-key accounting: returns the
/// source keys that match no feature, without touching the schema or any
/// attribute. Key order follows the source; duplicates are collapsed.
pub fn check_missing_keys<L: Layer>(
    layer: &L,
    rows: &[Vec<String>],
    key_column: usize,
    layer_key_field: &str,
) -> Result<Vec<String>> {
    if !layer.has_field(layer_key_field) {
        return Err(SchemaError::MissingField {
            field: layer_key_field.to_string(),
        }
        .into());
    }
    let mut layer_keys: BTreeSet<String> = BTreeSet::new();
    for id in layer.feature_ids() {
        if let Some(key) = key_string(&layer.value(id, layer_key_field)?) {
            layer_keys.insert(key);
        }
    }
    let mut missing = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for row in rows {
        let Some(key) = row.get(key_column) else {
            continue;
        };
        if !layer_keys.contains(key.as_str()) && seen.insert(key.as_str()) {
            missing.push(key.clone());
        }
    }
    Ok(missing)
}
