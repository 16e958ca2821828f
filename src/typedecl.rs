//! Type descriptor generator: derives a TypeScript interface from the same
//! normalized table the records are projected from, so the declared shape
//! always matches the emitted data.

use std::{fmt, sync::OnceLock};

use anyhow::{Result, ensure};
use regex::Regex;

use crate::normalize::{NormalizedColumn, NormalizedTable};

pub const DEFAULT_TYPE_NAME: &str = "IntersectionData";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Number,
    String,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Number => f.write_str("number"),
            PrimitiveType::String => f.write_str("string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub name: String,
    pub primitive: PrimitiveType,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeDescriptor {
    pub fields: Vec<FieldType>,
}

fn infer_primitive(column: &NormalizedColumn) -> PrimitiveType {
    let mut observed = column.values.iter().filter(|v| !v.is_missing()).peekable();
    if observed.peek().is_none() {
        // nothing observed, fall back to what the field's rule produces
        return if column.field.category.is_numeric() {
            PrimitiveType::Number
        } else {
            PrimitiveType::String
        };
    }
    if observed.all(|v| v.is_number()) {
        PrimitiveType::Number
    } else {
        PrimitiveType::String
    }
}

impl TypeDescriptor {
    pub fn describe(table: &NormalizedTable) -> Self {
        let fields = table
            .columns()
            .iter()
            .map(|column| FieldType {
                name: column.name().to_string(),
                primitive: infer_primitive(column),
                optional: column.has_missing(),
            })
            .collect();
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn render(&self, type_name: &str, export: bool) -> Result<String> {
        validate_type_name(type_name)?;
        let mut lines = Vec::with_capacity(self.fields.len() + 2);
        let keyword = if export { "export interface" } else { "interface" };
        lines.push(format!("{keyword} {type_name} {{"));
        for field in &self.fields {
            let marker = if field.optional { "?" } else { "" };
            lines.push(format!("    {}{}: {};", field.name, marker, field.primitive));
        }
        lines.push("}".to_string());
        Ok(lines.join("\n"))
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"))
}

pub fn validate_type_name(name: &str) -> Result<()> {
    ensure!(
        identifier_pattern().is_match(name),
        "'{name}' is not a valid TypeScript identifier"
    );
    Ok(())
}
