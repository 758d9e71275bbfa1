//! End-to-end flow over real files: load a table, join a source onto it,
//! label the group extrema, write the table back, and read the result.

use std::fs;

use tmap_core::{JoinOptions, LabelFormat, apply_extrema_labels, compute_group_extrema, join};
use tmap_ingest::{load_attribute_table, read_source, write_attribute_table};
use tmap_model::{FieldType, LayerFormatCapabilities, NO_DATA};

#[test]
fn join_label_and_write_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let table_path = dir.path().join("regions.csv");
    let source_path = dir.path().join("values.csv");
    fs::write(&table_path, "JOIN,GROUP\nK1,A\nK2,A\nK3,B\n").unwrap();
    fs::write(
        &source_path,
        "ID,PC_Haz,PC_Vuln\nK1,0.10,0.20\nK2,0.30,-9999\nK3,-9999,0.05\nK9,0.50,0.60\n",
    )
    .unwrap();

    let mut layer =
        load_attribute_table(&table_path, b',', LayerFormatCapabilities::table()).unwrap();
    let source = read_source(&source_path, b',').unwrap();

    let options = JoinOptions {
        key_column: 0,
        layer_key_field: "JOIN".to_string(),
        value_start: 1,
        value_end: None,
        value_type: FieldType::Double,
        unmatched_fill: None,
    };
    let report = join(&mut layer, &source.header, &source.rows, &options).unwrap();
    assert_eq!(report.applied_fields, vec!["PC_Haz", "PC_Vuln"]);
    assert_eq!(report.matched, 3);
    assert_eq!(report.unmatched, 0);
    assert_eq!(report.unconsumed_keys, vec!["K9"]);

    let extrema =
        compute_group_extrema(&layer, "JOIN", "GROUP", &report.applied_fields, NO_DATA).unwrap();
    let labels =
        apply_extrema_labels(&mut layer, "JOIN", "GROUP", &extrema, LabelFormat::Percent).unwrap();
    assert_eq!(labels, vec!["L_PC_Haz", "L_PC_Vuln"]);

    write_attribute_table(&layer, &table_path, b',').unwrap();

    let written = read_source(&table_path, b',').unwrap();
    assert_eq!(
        written.header,
        vec!["JOIN", "GROUP", "PC_Haz", "PC_Vuln", "L_PC_Haz", "L_PC_Vuln"]
    );
    // K2 carries group A's max hazard; its vulnerability is the sentinel and
    // gets no label.
    let k2 = written.rows.iter().find(|row| row[0] == "K2").unwrap();
    assert_eq!(k2[2], "0.3");
    assert_eq!(k2[3], "-9999");
    assert_eq!(k2[4], "30%");
    assert_eq!(k2[5], "");
    // K3's hazard is all-sentinel in group B, so no hazard label anywhere in
    // the group; its vulnerability is the group's only survivor.
    let k3 = written.rows.iter().find(|row| row[0] == "K3").unwrap();
    assert_eq!(k3[4], "");
    assert_eq!(k3[5], "5%");
}
