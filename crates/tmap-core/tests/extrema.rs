use std::collections::BTreeMap;

use tmap_core::{
    CoreError, ExtremaRecord, ExtremaReport, LabelFormat, SchemaError, apply_extrema_labels,
    compute_group_extrema,
};
use tmap_model::{
    AttrValue, FieldDef, FieldType, Layer, LayerFormatCapabilities, MemoryLayer, NO_DATA,
};

fn value_layer(rows: &[(&str, &str, f64)]) -> MemoryLayer {
    let mut layer = MemoryLayer::with_fields(
        LayerFormatCapabilities::shapefile(),
        vec![
            FieldDef::new("Admin1ID", FieldType::Text),
            FieldDef::new("JOIN", FieldType::Text),
            FieldDef::new("PC_Haz", FieldType::Double),
        ],
    );
    for (group, key, value) in rows {
        layer
            .push_feature([
                ("Admin1ID", AttrValue::Text((*group).to_string())),
                ("JOIN", AttrValue::Text((*key).to_string())),
                ("PC_Haz", AttrValue::Double(*value)),
            ])
            .unwrap();
    }
    layer
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn groups_get_max_and_min_records() {
    let layer = value_layer(&[("A", "1", 10.0), ("A", "2", 30.0), ("B", "3", 5.0)]);

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();

    let records = &report.extrema["PC_Haz"];
    let a = &records["A"];
    assert_eq!(a.max_key, "2");
    assert_eq!(a.max_value, 30.0);
    assert_eq!(a.min_key, "1");
    assert_eq!(a.min_value, 10.0);
    let b = &records["B"];
    assert_eq!(b.max_key, "3");
    assert_eq!(b.min_key, "3");
    assert_eq!(b.max_value, 5.0);
    assert_eq!(b.min_value, 5.0);
}

#[test]
fn grouping_does_not_require_contiguous_input() {
    // Group members interleaved; adjacency-based grouping would split them.
    let layer = value_layer(&[
        ("A", "1", 10.0),
        ("B", "3", 5.0),
        ("A", "2", 30.0),
        ("B", "4", 7.0),
    ]);

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();

    let records = &report.extrema["PC_Haz"];
    assert_eq!(records["A"].max_value, 30.0);
    assert_eq!(records["B"].max_value, 7.0);
}

#[test]
fn sentinel_values_are_excluded() {
    let layer = value_layer(&[("A", "1", NO_DATA), ("A", "2", 3.0), ("A", "3", 8.0)]);

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();

    let a = &report.extrema["PC_Haz"]["A"];
    assert_eq!(a.min_value, 3.0);
    assert_eq!(a.max_value, 8.0);
}

#[test]
fn all_sentinel_group_yields_no_record() {
    let layer = value_layer(&[("A", "1", NO_DATA), ("A", "2", NO_DATA), ("B", "3", 1.0)]);

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();

    let records = &report.extrema["PC_Haz"];
    assert!(!records.contains_key("A"));
    assert!(records.contains_key("B"));
}

#[test]
fn single_member_group_is_both_extrema() {
    let layer = value_layer(&[("B", "3", 5.0)]);

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();

    let b = &report.extrema["PC_Haz"]["B"];
    assert_eq!(b.max_key, b.min_key);
    assert_eq!(b.max_value, b.min_value);
}

#[test]
fn ties_break_to_first_encountered_key() {
    let layer = value_layer(&[("A", "1", 5.0), ("A", "2", 5.0), ("A", "3", 5.0)]);

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();

    let a = &report.extrema["PC_Haz"]["A"];
    assert_eq!(a.max_key, "1");
    assert_eq!(a.min_key, "1");
}

#[test]
fn uncoercible_value_is_reported_and_excluded() {
    let mut layer = value_layer(&[("A", "1", 10.0)]);
    layer
        .push_feature([
            ("Admin1ID", AttrValue::Text("A".to_string())),
            ("JOIN", AttrValue::Text("2".to_string())),
            ("PC_Haz", AttrValue::Text("abc".to_string())),
        ])
        .unwrap();

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].raw, "abc");
    let a = &report.extrema["PC_Haz"]["A"];
    assert_eq!(a.max_value, 10.0);
    assert_eq!(a.min_value, 10.0);
}

#[test]
fn missing_group_field_aborts() {
    let layer = value_layer(&[("A", "1", 10.0)]);
    let err = compute_group_extrema(&layer, "JOIN", "NOPE", &fields(&["PC_Haz"]), NO_DATA)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Schema(SchemaError::MissingField { .. })
    ));
}

#[test]
fn null_group_key_aborts() {
    let mut layer = value_layer(&[("A", "1", 10.0)]);
    layer
        .push_feature([
            ("JOIN", AttrValue::Text("2".to_string())),
            ("PC_Haz", AttrValue::Double(1.0)),
        ])
        .unwrap();

    let err = compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Schema(SchemaError::MissingKeyValue { .. })
    ));
}

#[test]
fn labels_are_written_to_extrema_features_only() {
    let mut layer = value_layer(&[
        ("A", "1", 0.10),
        ("A", "2", 0.30),
        ("A", "4", 0.20),
        ("B", "3", 0.05),
    ]);

    let report =
        compute_group_extrema(&layer, "JOIN", "Admin1ID", &fields(&["PC_Haz"]), NO_DATA).unwrap();
    let labels =
        apply_extrema_labels(&mut layer, "JOIN", "Admin1ID", &report, LabelFormat::Percent)
            .unwrap();

    assert_eq!(labels, vec!["L_PC_Haz"]);
    let ids = layer.feature_ids();
    assert_eq!(
        layer.value(ids[0], "L_PC_Haz").unwrap(),
        AttrValue::Text("10%".to_string())
    );
    assert_eq!(
        layer.value(ids[1], "L_PC_Haz").unwrap(),
        AttrValue::Text("30%".to_string())
    );
    // Mid-range feature gets no label.
    assert!(layer.value(ids[2], "L_PC_Haz").unwrap().is_null());
    // Singleton group: one write, max first.
    assert_eq!(
        layer.value(ids[3], "L_PC_Haz").unwrap(),
        AttrValue::Text("5%".to_string())
    );
}

#[test]
fn missing_join_key_aborts_before_any_label_is_written() {
    let mut layer = value_layer(&[("A", "1", 30.0)]);
    // Second feature belongs to the same group but has no join key.
    layer
        .push_feature([
            ("Admin1ID", AttrValue::Text("A".to_string())),
            ("PC_Haz", AttrValue::Double(10.0)),
        ])
        .unwrap();

    let mut records = BTreeMap::new();
    records.insert(
        "A".to_string(),
        ExtremaRecord {
            max_key: "1".to_string(),
            max_value: 30.0,
            min_key: "1".to_string(),
            min_value: 30.0,
        },
    );
    let mut extrema = BTreeMap::new();
    extrema.insert("PC_Haz".to_string(), records);
    let report = ExtremaReport {
        extrema,
        failures: Vec::new(),
    };

    let err = apply_extrema_labels(&mut layer, "JOIN", "Admin1ID", &report, LabelFormat::Raw)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Schema(SchemaError::MissingKeyValue { .. })
    ));
    // The aborted run provisioned nothing and wrote nothing.
    assert!(!layer.has_field("L_PC_Haz"));
}

#[test]
fn label_prefix_collision_is_reported() {
    let mut layer = MemoryLayer::with_fields(
        LayerFormatCapabilities::shapefile(),
        vec![
            FieldDef::new("Admin1ID", FieldType::Text),
            FieldDef::new("JOIN", FieldType::Text),
            FieldDef::new("PC_Overal", FieldType::Double),
            FieldDef::new("PC_Overa2", FieldType::Double),
        ],
    );
    layer
        .push_feature([
            ("Admin1ID", AttrValue::Text("A".to_string())),
            ("JOIN", AttrValue::Text("1".to_string())),
            ("PC_Overal", AttrValue::Double(1.0)),
            ("PC_Overa2", AttrValue::Double(2.0)),
        ])
        .unwrap();

    // Both value fields share their first eight characters, so the label
    // names collapse under the shapefile limit.
    let report = compute_group_extrema(
        &layer,
        "JOIN",
        "Admin1ID",
        &fields(&["PC_Overal", "PC_Overa2"]),
        NO_DATA,
    )
    .unwrap();
    let err =
        apply_extrema_labels(&mut layer, "JOIN", "Admin1ID", &report, LabelFormat::Raw)
            .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Schema(SchemaError::TruncationCollision { .. })
    ));
}
