//! Schema registry: the fixed, ordered mapping from spreadsheet header labels
//! to canonical output field names.
//!
//! The registry decides three things for every field:
//!
//! - **Identity**: the camelCase key a field carries in the JSON records.
//! - **Order**: the position of the field in every record and in the
//!   generated interface.
//! - **Category**: which coercion rule the normalizer applies to its cells.
//!
//! A registry is built once per run and handed to the normalizer and the type
//! generator explicitly.

use std::fmt;

use anyhow::{Result, bail, ensure};
use heck::ToLowerCamelCase;
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    BoundedNumeric,
    Year,
    Text,
}

impl FieldCategory {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldCategory::BoundedNumeric | FieldCategory::Year)
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldCategory::BoundedNumeric => "bounded-numeric",
            FieldCategory::Year => "year",
            FieldCategory::Text => "text",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub source_label: String,
    pub canonical_name: String,
    pub order: usize,
    pub category: FieldCategory,
}

pub const INTERSECTION_FIELDS: &[(&str, &str, FieldCategory)] = &[
    ("id", "id", FieldCategory::Text),
    ("Lat", "lat", FieldCategory::Text),
    ("Lng", "lng", FieldCategory::Text),
    ("Intersection", "intersection", FieldCategory::Text),
    ("TxDOT District", "txdotDistrict", FieldCategory::Text),
    ("City, State", "cityState", FieldCategory::Text),
    ("County", "county", FieldCategory::Text),
    ("On-System/Off-System", "onSystem", FieldCategory::Text),
    ("Type", "type", FieldCategory::Text),
    ("Status", "status", FieldCategory::Text),
    ("Year Completed", "yearCompleted", FieldCategory::Year),
    ("Previous Control Type", "previousControlType", FieldCategory::Text),
    ("Approaches", "approaches", FieldCategory::Text),
    ("Lane Type", "laneType", FieldCategory::Text),
    ("ICD (ft)", "icdFt", FieldCategory::BoundedNumeric),
    ("ICD (m)", "icdM", FieldCategory::BoundedNumeric),
    ("Other Control Type", "otherControlType", FieldCategory::Text),
    ("Comments", "comments", FieldCategory::Text),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    fields: Vec<FieldDefinition>,
}

impl SchemaRegistry {
    // Fails when a label or canonical name repeats, or when a canonical name
    // is not lowerCamelCase.
    pub fn new<I, S, C>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C, FieldCategory)>,
        S: Into<String>,
        C: Into<String>,
    {
        let fields = entries
            .into_iter()
            .enumerate()
            .map(|(order, (label, name, category))| FieldDefinition {
                source_label: label.into(),
                canonical_name: name.into(),
                order,
                category,
            })
            .collect::<Vec<_>>();

        if let Some(label) = fields.iter().map(|f| f.source_label.as_str()).duplicates().next() {
            bail!("source label '{label}' is mapped more than once");
        }
        if let Some(name) = fields
            .iter()
            .map(|f| f.canonical_name.as_str())
            .duplicates()
            .next()
        {
            bail!("canonical name '{name}' is used by more than one field");
        }
        for field in &fields {
            ensure!(
                !field.canonical_name.is_empty()
                    && field.canonical_name.to_lower_camel_case() == field.canonical_name,
                "canonical name '{}' for '{}' is not lowerCamelCase",
                field.canonical_name,
                field.source_label
            );
        }
        Ok(Self { fields })
    }

    pub fn intersections() -> Result<Self> {
        Self::new(INTERSECTION_FIELDS.iter().copied())
    }

    pub fn canonical_name_for(&self, source_label: &str) -> Option<&str> {
        let label = source_label.trim();
        self.fields
            .iter()
            .find(|f| f.source_label == label)
            .map(|f| f.canonical_name.as_str())
    }

    pub fn ordered_canonical_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.canonical_name.as_str())
    }

    pub fn field(&self, canonical_name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.canonical_name == canonical_name)
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
