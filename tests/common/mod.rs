#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::{TempDir, tempdir};

/// A cell written into a generated workbook fixture.
#[derive(Debug, Clone)]
pub enum SheetCell {
    Num(f64),
    Str(&'static str),
    Bool(bool),
    /// Calendar date as `(year, month, day)`, stored with a date format.
    Date(u16, u8, u8),
    Blank,
}

/// Header row used by the full intersection export.
pub const INTERSECTION_HEADERS: &[&str] = &[
    "id",
    "Lat",
    "Lng",
    "Intersection",
    "TxDOT District",
    "City, State",
    "County",
    "On-System/Off-System",
    "Type",
    "Status",
    "Year Completed",
    "Previous Control Type",
    "Approaches",
    "Lane Type",
    "ICD (ft)",
    "ICD (m)",
    "Other Control Type",
    "Comments",
];

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    /// Writes a single-sheet workbook under the workspace and returns the path.
    pub fn write_workbook(&self, name: &str, headers: &[&str], rows: &[Vec<SheetCell>]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let worksheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, *header)
                .expect("write header");
        }
        for (row_idx, row) in rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    SheetCell::Num(value) => {
                        worksheet
                            .write_number(row_num, col as u16, *value)
                            .expect("write number");
                    }
                    SheetCell::Str(value) => {
                        worksheet
                            .write_string(row_num, col as u16, *value)
                            .expect("write string");
                    }
                    SheetCell::Bool(value) => {
                        worksheet
                            .write_boolean(row_num, col as u16, *value)
                            .expect("write boolean");
                    }
                    SheetCell::Date(year, month, day) => {
                        let date = ExcelDateTime::from_ymd(*year, *month, *day).expect("valid date");
                        worksheet
                            .write_datetime_with_format(row_num, col as u16, &date, &date_format)
                            .expect("write date");
                    }
                    SheetCell::Blank => {}
                }
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(relative)).expect("read output file")
    }
}

/// Two rows covering every field of the intersection export.
pub fn intersection_rows() -> Vec<Vec<SheetCell>> {
    use SheetCell::{Blank, Num, Str};
    vec![
        vec![
            Num(1.0),
            Str("30.2672"),
            Str("-97.7431"),
            Str("FM 1626 at Brodie Ln"),
            Str("Austin"),
            Str("Austin, TX"),
            Str("Travis"),
            Str("On-System"),
            Str("Roundabout"),
            Str("Completed"),
            Num(2015.0),
            Str("Signal"),
            Str("4"),
            Str("Single"),
            Str("NaN"),
            Num(36.58),
            Blank,
            Blank,
        ],
        vec![
            Num(2.0),
            Str("29.4241"),
            Str("-98.4936"),
            Str("Loop 1604 at Bulverde Rd"),
            Blank,
            Str("San Antonio, TX"),
            Str("Bexar"),
            Blank,
            Str("Roundabout"),
            Str("Planned"),
            Blank,
            Blank,
            Str("3"),
            Str("Multi"),
            Num(45.0),
            Num(13.7),
            Str("Yield"),
            Str("Near school"),
        ],
    ]
}
