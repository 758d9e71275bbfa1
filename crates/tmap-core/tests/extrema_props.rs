use proptest::prelude::*;

use tmap_core::compute_group_extrema;
use tmap_model::{
    AttrValue, FieldDef, FieldType, LayerFormatCapabilities, MemoryLayer, NO_DATA,
};

fn build_layer(rows: &[(u8, f64)]) -> MemoryLayer {
    let mut layer = MemoryLayer::with_fields(
        LayerFormatCapabilities::table(),
        vec![
            FieldDef::new("GROUP", FieldType::Text),
            FieldDef::new("KEY", FieldType::Text),
            FieldDef::new("VAL", FieldType::Double),
        ],
    );
    for (index, (group, value)) in rows.iter().enumerate() {
        layer
            .push_feature([
                ("GROUP", AttrValue::Text(format!("G{group}"))),
                ("KEY", AttrValue::Text(format!("F{index}"))),
                ("VAL", AttrValue::Double(*value)),
            ])
            .unwrap();
    }
    layer
}

fn group_values(rows: &[(u8, f64)], group: &str) -> Vec<f64> {
    rows.iter()
        .filter(|(g, _)| format!("G{g}") == group)
        .map(|(_, v)| *v)
        .collect()
}

proptest! {
    // Values stay clear of the sentinel; separate cases cover it.
    #[test]
    fn extrema_bound_their_groups(
        rows in prop::collection::vec((0u8..4u8, -50.0f64..50.0), 1..40)
    ) {
        let layer = build_layer(&rows);
        let report = compute_group_extrema(
            &layer,
            "KEY",
            "GROUP",
            &["VAL".to_string()],
            NO_DATA,
        )
        .unwrap();

        let records = &report.extrema["VAL"];
        for (group, record) in records {
            let values = group_values(&rows, group);
            prop_assert!(record.max_value >= record.min_value);
            prop_assert!(values.contains(&record.max_value));
            prop_assert!(values.contains(&record.min_value));
            prop_assert!(values.iter().all(|v| *v <= record.max_value));
            prop_assert!(values.iter().all(|v| *v >= record.min_value));
        }
        // Every populated group produced a record.
        for (group, _) in &rows {
            let name = format!("G{group}");
            prop_assert!(records.contains_key(&name));
        }
    }

    #[test]
    fn sentinels_never_become_extrema(
        rows in prop::collection::vec((0u8..3u8, prop::bool::ANY, -50.0f64..50.0), 1..40)
    ) {
        let materialized: Vec<(u8, f64)> = rows
            .iter()
            .map(|(g, is_sentinel, v)| (*g, if *is_sentinel { NO_DATA } else { *v }))
            .collect();
        let layer = build_layer(&materialized);
        let report = compute_group_extrema(
            &layer,
            "KEY",
            "GROUP",
            &["VAL".to_string()],
            NO_DATA,
        )
        .unwrap();

        let records = &report.extrema["VAL"];
        for (group, record) in records {
            prop_assert!(record.max_value != NO_DATA);
            prop_assert!(record.min_value != NO_DATA);
            let survivors: Vec<f64> = group_values(&materialized, group)
                .into_iter()
                .filter(|v| *v != NO_DATA)
                .collect();
            prop_assert!(!survivors.is_empty());
            prop_assert!(survivors.contains(&record.max_value));
        }
        // Groups that are all sentinel contribute nothing.
        for (group, is_sentinel, _) in &rows {
            let name = format!("G{group}");
            let has_survivor = group_values(&materialized, &name)
                .iter()
                .any(|v| *v != NO_DATA);
            if !is_sentinel && has_survivor {
                prop_assert!(records.contains_key(&name));
            }
        }
    }
}
