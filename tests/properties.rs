use intersection_convert::{
    convert::build_artifacts,
    data::{CellValue, RawTable},
    schema::{FieldCategory, SchemaRegistry},
};
use proptest::prelude::*;
use serde_json::Value;

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Missing),
        Just(CellValue::Text("NaN".to_string())),
        (0u32..5000).prop_map(|n| CellValue::Number(f64::from(n))),
        (0u32..100_000).prop_map(|n| CellValue::Number(f64::from(n) / 100.0)),
        "[A-Za-z ,]{1,12}".prop_map(CellValue::Text),
    ]
}

fn sheet_strategy() -> impl Strategy<Value = RawTable> {
    let registry = SchemaRegistry::intersections().unwrap();
    let mut labels = registry
        .fields()
        .iter()
        .map(|f| f.source_label.clone())
        .collect::<Vec<_>>();
    labels.push("Unmapped".to_string());
    (
        proptest::sample::subsequence(labels, 1..=19).prop_shuffle(),
        0usize..12,
    )
        .prop_flat_map(|(headers, row_count)| {
            let width = headers.len();
            proptest::collection::vec(
                proptest::collection::vec(cell_strategy(), width),
                row_count,
            )
            .prop_map(move |rows| RawTable::new(headers.clone(), rows))
        })
}

proptest! {
    #[test]
    fn records_match_declared_shape(raw in sheet_strategy()) {
        let registry = SchemaRegistry::intersections().unwrap();
        let artifacts = build_artifacts(&registry, &raw, "IntersectionData", false).unwrap();
        let records: Vec<serde_json::Map<String, Value>> =
            serde_json::from_str(&artifacts.json).unwrap();

        prop_assert_eq!(records.len(), raw.rows.len());

        let expected_order = registry
            .ordered_canonical_names()
            .filter(|name| {
                raw.headers
                    .iter()
                    .any(|h| registry.canonical_name_for(h) == Some(*name))
            })
            .collect::<Vec<_>>();
        let declared = artifacts
            .descriptor
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>();
        prop_assert_eq!(&declared, &expected_order);

        for field in &artifacts.descriptor.fields {
            let category = registry.field(&field.name).unwrap().category;
            let values = records.iter().map(|r| &r[&field.name]).collect::<Vec<_>>();
            match category {
                FieldCategory::BoundedNumeric | FieldCategory::Year => {
                    prop_assert!(values.iter().all(|v| v.is_number()));
                    prop_assert!(values.iter().all(|v| v.as_f64().unwrap() >= -1.0));
                    prop_assert!(!field.optional);
                }
                FieldCategory::Text => {
                    prop_assert!(values.iter().all(|v| v.is_string() || v.is_null()));
                }
            }
            prop_assert_eq!(field.optional, values.iter().any(|v| v.is_null()));
        }
    }

    #[test]
    fn record_keys_follow_registry_order(raw in sheet_strategy()) {
        let registry = SchemaRegistry::intersections().unwrap();
        let artifacts = build_artifacts(&registry, &raw, "IntersectionData", false).unwrap();
        let declared = artifacts
            .descriptor
            .fields
            .iter()
            .map(|f| format!("\"{}\":", f.name))
            .collect::<Vec<_>>();
        for chunk in artifacts.json.split("\n    }") {
            let mut cursor = 0usize;
            for key in &declared {
                if let Some(offset) = chunk[cursor..].find(key.as_str()) {
                    cursor += offset + key.len();
                } else {
                    prop_assert!(!chunk.contains('{'), "key {} missing from record", key);
                }
            }
        }
    }
}
