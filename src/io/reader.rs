//! Reading BGI differential expression tables
//!
//! Input files are either tab- or comma-delimited and may or may not start
//! with a header line. The delimiter is found by trying each candidate on the
//! first line in a fixed order; the header is recognized by its non-numeric
//! value columns.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use crate::data::{ExpressionRow, CONTROL_COL, EXPERIMENTAL_COL, FDR_COL};
use crate::error::{PrepError, Result};

/// Fewest fields the first line must split into for a delimiter to be accepted
pub const MIN_FORMAT_FIELDS: usize = 8;

/// Candidate field separators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    /// Order in which delimiters are tried
    pub const SEARCH_ORDER: [Delimiter; 2] = [Delimiter::Tab, Delimiter::Comma];

    pub fn byte(&self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }

    /// Split one line with this delimiter
    fn split(&self, line: &str) -> Result<StringRecord> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.byte())
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        match reader.records().next() {
            Some(record) => Ok(record?),
            None => Ok(StringRecord::new()),
        }
    }
}

/// Layout of one input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: Delimiter,
    pub has_header: bool,
}

/// Whether a first line looks like a header rather than data.
///
/// Every value column must be a non-numeric label; a partly numeric line is
/// data and goes through normal row validation.
fn looks_like_header(record: &StringRecord) -> bool {
    [CONTROL_COL, EXPERIMENTAL_COL, FDR_COL].iter().all(|&col| {
        record
            .get(col)
            .map_or(true, |value| value.trim().parse::<f64>().is_err())
    })
}

/// Detect delimiter and header presence from the first line of a file
pub fn detect_format<P: AsRef<Path>>(path: P) -> Result<TableFormat> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut first_line = String::new();
    let n_read = BufReader::new(file).read_line(&mut first_line)?;
    if n_read == 0 {
        return Err(PrepError::EmptyData {
            reason: format!("{} is empty", path.display()),
        });
    }
    let first_line = first_line.trim_end_matches(['\r', '\n']);

    for delimiter in Delimiter::SEARCH_ORDER {
        let record = delimiter.split(first_line)?;
        if record.len() >= MIN_FORMAT_FIELDS {
            let format = TableFormat {
                delimiter,
                has_header: looks_like_header(&record),
            };
            log::debug!("{}: detected {:?}", path.display(), format);
            return Ok(format);
        }
    }

    Err(PrepError::UnknownFormat {
        path: path.display().to_string(),
    })
}

/// Lazy iterator over the usable rows of one input file
pub struct RowReader {
    path: String,
    records: StringRecordsIntoIter<File>,
}

impl RowReader {
    /// Open a file, detecting its format first
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let format = detect_format(&path)?;
        Self::with_format(path, format)
    }

    /// Open a file with an already known format
    pub fn with_format<P: AsRef<Path>>(path: P, format: TableFormat) -> Result<Self> {
        let path = path.as_ref();
        let reader = ReaderBuilder::new()
            .delimiter(format.delimiter.byte())
            .has_headers(format.has_header)
            .flexible(true)
            .from_path(path)?;
        Ok(Self {
            path: path.display().to_string(),
            records: reader.into_records(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Iterator for RowReader {
    type Item = Result<ExpressionRow>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            let record = match record {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };
            let line = record.position().map_or(0, |pos| pos.line());
            match ExpressionRow::from_record(&record, &self.path, line) {
                Ok(Some(row)) => return Some(Ok(row)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Open a BGI table and iterate over its usable rows
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<RowReader> {
    RowReader::open(path)
}
