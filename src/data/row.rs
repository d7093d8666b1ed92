//! A single parsed line of a BGI differential expression table

use csv::StringRecord;

use crate::error::{PrepError, Result};

/// Column holding the control sample expression value
pub const CONTROL_COL: usize = 2;
/// Column holding the experimental sample expression value
pub const EXPERIMENTAL_COL: usize = 3;
/// Column holding the false discovery rate
pub const FDR_COL: usize = 5;
/// Column holding the gene symbol
pub const GENE_COL: usize = 8;
/// Minimum number of fields for a row to be usable
pub const MIN_FIELDS: usize = GENE_COL + 1;

/// Placeholder used by BGI tables for unannotated genes
const NA_SYMBOL: &str = "NA";

/// One usable data row of an input table
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionRow {
    /// Gene symbol exactly as it appears in the file
    pub gene: String,
    /// Control sample expression
    pub control: f64,
    /// Experimental sample expression
    pub experimental: f64,
    /// False discovery rate
    pub fdr: f64,
    /// All fields of the line, by position
    pub fields: Vec<String>,
    /// 1-based line number in the source file
    pub line: u64,
}

impl ExpressionRow {
    /// Build a row from a parsed record.
    ///
    /// Returns `Ok(None)` for rows that are not usable (too few fields, empty or
    /// `NA` gene symbol). Numeric columns are only parsed for usable rows; a
    /// non-numeric or non-finite value (`NaN`, `inf`) there is a `MalformedRow`
    /// error.
    pub fn from_record(record: &StringRecord, path: &str, line: u64) -> Result<Option<Self>> {
        if record.len() < MIN_FIELDS {
            log::debug!(
                "{}:{}: skipping row with {} fields (need {})",
                path,
                line,
                record.len(),
                MIN_FIELDS
            );
            return Ok(None);
        }

        let gene = record[GENE_COL].trim();
        if !is_valid_symbol(gene) {
            return Ok(None);
        }

        let parse = |col: usize, name: &str| -> Result<f64> {
            let raw = record[col].trim();
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(PrepError::MalformedRow {
                    path: path.to_string(),
                    line,
                    reason: format!(
                        "{} value '{}' in column {} is not a finite number",
                        name, raw, col
                    ),
                }),
            }
        };

        Ok(Some(Self {
            gene: gene.to_string(),
            control: parse(CONTROL_COL, "control")?,
            experimental: parse(EXPERIMENTAL_COL, "experimental")?,
            fdr: parse(FDR_COL, "FDR")?,
            fields: record.iter().map(str::to_string).collect(),
            line,
        }))
    }

    /// Larger of the two expression values
    pub fn max_expression(&self) -> f64 {
        self.control.max(self.experimental)
    }
}

/// Whether a gene symbol identifies a real gene
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol != NA_SYMBOL
}
