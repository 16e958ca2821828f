//! Record projector: renders a normalized table as a pretty-printed JSON array
//! with one object per row.

use anyhow::{Context, Result};
use serde::{Serialize, Serializer, ser::SerializeMap, ser::SerializeSeq};
use serde_json::ser::PrettyFormatter;

use crate::normalize::NormalizedTable;

const JSON_INDENT: &[u8] = b"    ";

struct Records<'a>(&'a NormalizedTable);

struct Record<'a> {
    table: &'a NormalizedTable,
    row: usize,
}

impl Serialize for Records<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.row_count()))?;
        for row in 0..self.0.row_count() {
            seq.serialize_element(&Record {
                table: self.0,
                row,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Record<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.table.columns().len()))?;
        for (name, value) in self.table.row(self.row) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub fn project_records(table: &NormalizedTable) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    Records(table)
        .serialize(&mut serializer)
        .context("Serializing intersection records")?;
    String::from_utf8(buffer).context("Serialized records are not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{CellValue, RawTable},
        normalize::normalize_table,
        schema::SchemaRegistry,
    };

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn project(headers: &[&str], rows: Vec<Vec<CellValue>>) -> String {
        let registry = SchemaRegistry::intersections().unwrap();
        let raw = RawTable::new(headers.iter().map(|h| h.to_string()).collect(), rows);
        project_records(&normalize_table(&registry, &raw)).unwrap()
    }

    #[test]
    fn projects_rows_with_four_space_indent_in_registry_order() {
        let json = project(
            &["Comments", "Year Completed", "ICD (ft)", "id"],
            vec![vec![
                CellValue::Missing,
                CellValue::Number(2015.0),
                text("NaN"),
                CellValue::Number(12.0),
            ]],
        );
        let expected = r#"[
    {
        "id": "12",
        "yearCompleted": 2015,
        "icdFt": -1,
        "comments": null
    }
]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn integral_measurements_have_no_fraction() {
        let json = project(
            &["ICD (ft)", "ICD (m)"],
            vec![vec![CellValue::Number(45.0), CellValue::Number(13.72)]],
        );
        assert!(json.contains(r#""icdFt": 45,"#));
        assert!(json.contains(r#""icdM": 13.72"#));
    }

    #[test]
    fn empty_sheet_projects_empty_array() {
        assert_eq!(project(&["id", "Lat"], Vec::new()), "[]");
    }

    #[test]
    fn projection_preserves_row_count() {
        let rows = (0..25)
            .map(|idx| vec![CellValue::Number(idx as f64), CellValue::Missing])
            .collect();
        let json = project(&["id", "Status"], rows);
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 25);
        assert_eq!(parsed[24]["id"], "24");
        assert!(parsed[0]["status"].is_null());
    }
}
