//! Input and output plumbing for a conversion run.
//!
//! - **Workbooks**: the first sheet of `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and
//!   `.ods` files is read through calamine.
//! - **Delimited exports**: `.csv` and `.tsv` files are read with the csv
//!   crate, decoded through `encoding_rs` (UTF-8 unless told otherwise).
//!   A column whose non-missing fields all parse as numbers is read as
//!   numbers; any other column stays text.
//! - **Artifacts**: output text files are written after creating any missing
//!   parent directories.

use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::{CellValue, RawTable, format_number},
    error::ConvertError,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Delimited,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv") => {
                InputFormat::Delimited
            }
            _ => InputFormat::Workbook,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DelimitedOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn read_first_sheet(path: &Path, options: &DelimitedOptions) -> Result<RawTable, ConvertError> {
    let table = match InputFormat::from_path(path) {
        InputFormat::Workbook => read_workbook(path),
        InputFormat::Delimited => read_delimited(path, options),
    }
    .map_err(|err| ConvertError::input_read(path, err))?;
    debug!(
        "Read {} row(s) across {} column(s) from {:?}",
        table.row_count(),
        table.headers.len(),
        path
    );
    Ok(table)
}

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Opening workbook {path:?}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Workbook {path:?} does not contain any sheets"))?
        .with_context(|| format!("Reading first sheet of {path:?}"))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(RawTable::default());
    };
    let headers = header_row.iter().map(header_label).collect();
    let rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    Ok(RawTable::new(headers, rows))
}

fn header_label(cell: &Data) -> String {
    match cell_value(cell) {
        CellValue::Text(text) => text.trim().to_string(),
        CellValue::Number(number) => format_number(number),
        CellValue::Bool(flag) => String::from(if flag { "True" } else { "False" }),
        CellValue::Missing => String::new(),
    }
}

// Maps a workbook cell onto the reader-boundary cell model. Error cells such
// as `#N/A` read as missing; date cells read as rendered text.
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::String(value) => CellValue::from_text(value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => {
            let rendered = value
                .is_datetime()
                .then(|| value.as_datetime())
                .flatten()
                .map(|datetime| datetime.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| format_number(value.as_f64()));
            CellValue::Text(rendered)
        }
        Data::DateTimeIso(value) | Data::DurationIso(value) => CellValue::from_text(value),
        Data::Error(_) | Data::Empty => CellValue::Missing,
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

fn read_delimited(path: &Path, options: &DelimitedOptions) -> Result<RawTable> {
    let delimiter = resolve_input_delimiter(path, options.delimiter);
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut reader = open_csv_reader(BufReader::new(file), delimiter);

    let header_record = reader.byte_headers()?.clone();
    let headers = decode_record(&header_record, options.encoding)?
        .into_iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} in {:?}", idx + 2, path))?;
        let decoded = decode_record(&record, options.encoding)
            .with_context(|| format!("Decoding row {} in {:?}", idx + 2, path))?;
        records.push(decoded);
    }
    Ok(RawTable::new(headers, delimited_cells(records)))
}

fn is_na_token(field: &str) -> bool {
    NA_TOKENS.contains(&field.trim())
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

// Types every field of the export by column: numeric only when all of the
// column's non-missing fields parse as numbers.
fn delimited_cells(records: Vec<Vec<String>>) -> Vec<Vec<CellValue>> {
    let width = records.iter().map(Vec::len).max().unwrap_or(0);
    let numeric_columns = (0..width)
        .map(|col| {
            records
                .iter()
                .filter_map(|record| record.get(col))
                .filter(|field| !is_na_token(field))
                .all(|field| parse_number(field).is_some())
        })
        .collect::<Vec<_>>();

    records
        .into_iter()
        .map(|record| {
            record
                .into_iter()
                .enumerate()
                .map(|(col, field)| {
                    if is_na_token(&field) {
                        return CellValue::Missing;
                    }
                    match parse_number(&field) {
                        Some(number) if numeric_columns[col] => CellValue::Number(number),
                        _ => CellValue::Text(field),
                    }
                })
                .collect()
        })
        .collect()
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn write_text_file(path: &Path, contents: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| ConvertError::output_write(parent, err))?;
    }
    fs::write(path, contents).map_err(|err| ConvertError::output_write(path, err))
}
