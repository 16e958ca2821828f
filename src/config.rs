//! Run settings: built-in defaults, overlaid by an optional YAML file,
//! overlaid by command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    cli::ConvertArgs,
    error::ConvertError,
    io_utils::{self, DelimitedOptions},
    typedecl::{DEFAULT_TYPE_NAME, validate_type_name},
};

pub const DEFAULT_JSON_OUTPUT: &str = "src/data/intersections.json";
pub const DEFAULT_TYPES_OUTPUT: &str = "src/types/IntersectionData.ts";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub project_root: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
    pub types_output: Option<PathBuf>,
    pub type_name: Option<String>,
    pub export: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Opening config file {path:?}"))?;
        Self::parse(&raw).with_context(|| format!("Parsing config file {path:?}"))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub input: PathBuf,
    pub json_output: PathBuf,
    pub types_output: PathBuf,
    pub type_name: String,
    pub export: bool,
    pub delimited: DelimitedOptions,
}

fn under_root(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

impl Settings {
    pub fn resolve(args: &ConvertArgs) -> Result<Self, ConvertError> {
        let file = match &args.config {
            Some(path) => {
                FileConfig::load(path).map_err(|err| ConvertError::Config(format!("{err:#}")))?
            }
            None => FileConfig::default(),
        };
        Self::layer(args, file)
    }

    pub fn layer(args: &ConvertArgs, file: FileConfig) -> Result<Self, ConvertError> {
        let root = args
            .project_root
            .clone()
            .or(file.project_root)
            .unwrap_or_else(|| PathBuf::from("."));
        let json_output = args
            .json_output
            .clone()
            .or(file.json_output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JSON_OUTPUT));
        let types_output = args
            .types_output
            .clone()
            .or(file.types_output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TYPES_OUTPUT));
        let type_name = args
            .type_name
            .clone()
            .or(file.type_name)
            .unwrap_or_else(|| DEFAULT_TYPE_NAME.to_string());
        validate_type_name(&type_name).map_err(|err| ConvertError::Config(err.to_string()))?;

        let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())
            .map_err(|err| ConvertError::Config(err.to_string()))?;

        Ok(Self {
            input: args.input.clone(),
            json_output: under_root(&root, json_output),
            types_output: under_root(&root, types_output),
            type_name,
            export: args.export || file.export.unwrap_or(false),
            delimited: DelimitedOptions {
                delimiter: args.delimiter,
                encoding,
            },
        })
    }
}
