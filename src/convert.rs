//! Pipeline driver: read the sheet, normalize it once, and derive both
//! artifacts from that single normalized table before anything is written.

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use sha2::{Digest, Sha256};

use crate::{
    cli::ConvertArgs,
    config::Settings,
    data::RawTable,
    error::ConvertError,
    io_utils,
    normalize::normalize_table,
    project::project_records,
    schema::SchemaRegistry,
    typedecl::TypeDescriptor,
};

#[derive(Debug, Clone)]
pub struct Artifacts {
    pub json: String,
    pub declaration: String,
    pub descriptor: TypeDescriptor,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub json_output: PathBuf,
    pub types_output: PathBuf,
    pub row_count: usize,
}

pub fn build_artifacts(
    registry: &SchemaRegistry,
    raw: &RawTable,
    type_name: &str,
    export: bool,
) -> Result<Artifacts> {
    let table = normalize_table(registry, raw);
    let json = project_records(&table)?;
    let descriptor = TypeDescriptor::describe(&table);
    let declaration = descriptor
        .render(type_name, export)
        .with_context(|| format!("Rendering interface '{type_name}'"))?;
    Ok(Artifacts {
        json,
        declaration,
        descriptor,
        row_count: table.row_count(),
    })
}

pub fn execute(args: &ConvertArgs) -> Result<ConversionSummary> {
    let settings = Settings::resolve(args)?;
    let registry =
        SchemaRegistry::intersections().map_err(|err| ConvertError::Schema(format!("{err:#}")))?;
    let summary = convert(&registry, &settings)?;
    println!("JSON file saved to: {}", summary.json_output.display());
    println!("TypeScript interface saved to: {}", summary.types_output.display());
    Ok(summary)
}

pub fn convert(registry: &SchemaRegistry, settings: &Settings) -> Result<ConversionSummary> {
    info!("Reading first sheet of {:?}", settings.input);
    let raw = io_utils::read_first_sheet(&settings.input, &settings.delimited)?;
    info!(
        "Read {} row(s) with {} column(s)",
        raw.row_count(),
        raw.headers.len()
    );

    let artifacts = build_artifacts(registry, &raw, &settings.type_name, settings.export)?;
    info!(
        "Normalized {} row(s) into {} field(s)",
        artifacts.row_count,
        artifacts.descriptor.fields.len()
    );

    write_artifact(&settings.json_output, &artifacts.json)?;
    write_artifact(&settings.types_output, &artifacts.declaration)?;

    Ok(ConversionSummary {
        json_output: settings.json_output.clone(),
        types_output: settings.types_output.clone(),
        row_count: artifacts.row_count,
    })
}

fn write_artifact(path: &std::path::Path, contents: &str) -> Result<(), ConvertError> {
    io_utils::write_text_file(path, contents)?;
    let digest = Sha256::digest(contents.as_bytes());
    info!(
        "Wrote {} byte(s) to {:?} (sha256 {:x})",
        contents.len(),
        path,
        digest
    );
    Ok(())
}
