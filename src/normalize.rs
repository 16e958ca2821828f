//! Column normalizer: renames raw sheet columns through the registry and
//! coerces every cell into its field's canonical value.
//!
//! Normalization never fails. A cell that cannot be read as its field's type
//! falls back to the sentinel (numeric fields) or stays missing (text fields)
//! and is counted as an anomaly for the run log.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::{
    data::{CellValue, RawTable, Value, format_number},
    schema::{FieldCategory, FieldDefinition, SchemaRegistry},
};

pub const NUMERIC_SENTINEL: i64 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumn {
    pub field: FieldDefinition,
    pub values: Vec<Value>,
    pub anomalies: usize,
}

impl NormalizedColumn {
    pub fn name(&self) -> &str {
        &self.field.canonical_name
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    columns: Vec<NormalizedColumn>,
    row_count: usize,
}

impl NormalizedTable {
    pub fn columns(&self) -> &[NormalizedColumn] {
        &self.columns
    }

    pub fn column(&self, canonical_name: &str) -> Option<&NormalizedColumn> {
        self.columns.iter().find(|c| c.name() == canonical_name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn row(&self, index: usize) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .filter_map(move |c| c.values.get(index).map(|v| (c.name(), v)))
    }
}

// Whole numbers outside the i64 range stay floats rather than saturating.
fn whole_number(number: f64) -> Value {
    if number.abs() < i64::MAX as f64 {
        Value::Integer(number as i64)
    } else {
        Value::Float(number)
    }
}

pub fn normalize_cell(category: FieldCategory, cell: &CellValue) -> Value {
    match category {
        FieldCategory::BoundedNumeric => match cell.as_finite_number() {
            Some(number) if number.fract() == 0.0 => whole_number(number),
            Some(number) => Value::Float(number),
            None => Value::Integer(NUMERIC_SENTINEL),
        },
        FieldCategory::Year => match cell.as_finite_number() {
            Some(number) => whole_number(number.trunc()),
            None => Value::Integer(NUMERIC_SENTINEL),
        },
        FieldCategory::Text => match cell {
            CellValue::Missing => Value::Missing,
            CellValue::Number(number) => Value::String(format_number(*number)),
            CellValue::Text(text) => Value::String(text.clone()),
            CellValue::Bool(flag) => Value::String(if *flag { "True" } else { "False" }.to_string()),
        },
    }
}

// literal `NaN` text counts as missing, not as an anomaly
fn is_anomaly(category: FieldCategory, cell: &CellValue) -> bool {
    if !category.is_numeric() {
        return false;
    }
    match cell {
        CellValue::Missing | CellValue::Bool(_) => false,
        CellValue::Number(number) => number.is_infinite(),
        CellValue::Text(text) => !text.trim().eq_ignore_ascii_case("nan"),
    }
}

fn locate_columns(registry: &SchemaRegistry, raw: &RawTable) -> HashMap<String, usize> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (idx, header) in raw.headers.iter().enumerate() {
        let Some(name) = registry.canonical_name_for(header) else {
            debug!("Ignoring column '{header}' (not part of the schema)");
            continue;
        };
        if positions.contains_key(name) {
            warn!("Column '{header}' appears more than once; keeping the first occurrence");
            continue;
        }
        positions.insert(name.to_string(), idx);
    }
    positions
}

pub fn normalize_table(registry: &SchemaRegistry, raw: &RawTable) -> NormalizedTable {
    let positions = locate_columns(registry, raw);
    let row_count = raw.row_count();
    let mut columns = Vec::with_capacity(positions.len());

    for field in registry.fields() {
        let Some(&position) = positions.get(&field.canonical_name) else {
            warn!(
                "Column '{}' not found in sheet; '{}' will be omitted",
                field.source_label, field.canonical_name
            );
            continue;
        };

        debug!(
            "Normalizing '{}' -> '{}' as {}",
            field.source_label, field.canonical_name, field.category
        );
        let mut anomalies = 0usize;
        let values = (0..row_count)
            .map(|row| {
                let cell = raw.cell(row, position);
                if is_anomaly(field.category, cell) {
                    anomalies += 1;
                    debug!(
                        "Row {} column '{}': {:?} is not a number, using {}",
                        row + 2,
                        field.source_label,
                        cell,
                        NUMERIC_SENTINEL
                    );
                }
                normalize_cell(field.category, cell)
            })
            .collect::<Vec<_>>();

        if anomalies > 0 {
            info!(
                "{} value(s) in '{}' could not be read as numbers and were set to {}",
                anomalies, field.source_label, NUMERIC_SENTINEL
            );
        }

        columns.push(NormalizedColumn {
            field: field.clone(),
            values,
            anomalies,
        });
    }

    NormalizedTable { columns, row_count }
}
