use std::path::PathBuf;

use clap::{Args, Parser};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Convert the intersection spreadsheet into JSON data and a TypeScript interface",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub args: ConvertArgs,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Spreadsheet to convert (.xlsx, .xls, .ods, or a .csv/.tsv export); only the first sheet is read
    pub input: PathBuf,
    /// Directory the output paths resolve against (defaults to the current directory)
    #[arg(long = "project-root")]
    pub project_root: Option<PathBuf>,
    /// JSON data file path (default: src/data/intersections.json)
    #[arg(long = "json-output")]
    pub json_output: Option<PathBuf>,
    /// TypeScript declaration file path (default: src/types/IntersectionData.ts)
    #[arg(long = "types-output")]
    pub types_output: Option<PathBuf>,
    /// Name of the generated interface
    #[arg(long = "type-name")]
    pub type_name: Option<String>,
    /// Prefix the generated interface with `export`
    #[arg(long)]
    pub export: bool,
    /// YAML file providing any of the settings above
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Delimiter for CSV/TSV input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of CSV/TSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("Delimiter must be a single ASCII character, got '{value}'")),
            }
        }
    }
}
