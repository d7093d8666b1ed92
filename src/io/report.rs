//! Machine-readable summary of a conversion run

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::FilterCriteria;
use crate::error::Result;

/// Per-input-file filtering outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    /// Usable rows read from the file
    pub rows: usize,
    /// Genes that passed every filter
    pub qualifying_genes: usize,
}

/// Outcome of one run of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub criteria: FilterCriteria,
    pub files: Vec<FileSummary>,
    pub selected_genes: usize,
    /// Gene/file combinations without a row
    pub missing_values: usize,
    pub res_file: String,
    pub cls_file: String,
}

impl RunSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Conversion summary")?;
        writeln!(
            f,
            "  direction: {}, FDR <= {}, min expression: {}, quorum: {}/{}",
            self.criteria.direction,
            self.criteria.max_fdr,
            self.criteria.min_expression,
            self.criteria.min_files,
            self.files.len()
        )?;
        for file in &self.files {
            writeln!(
                f,
                "  {}: {} qualifying of {} rows",
                file.path, file.qualifying_genes, file.rows
            )?;
        }
        writeln!(f, "  selected genes: {}", self.selected_genes)?;
        if self.missing_values > 0 {
            writeln!(f, "  missing values (NaN): {}", self.missing_values)?;
        }
        write!(f, "  outputs: {}, {}", self.res_file, self.cls_file)
    }
}

/// Write the summary as pretty-printed JSON
pub fn write_summary<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<()> {
    let json = summary.to_json()?;
    super::gsea::write_atomic(path, |w| {
        std::io::Write::write_all(w, json.as_bytes())?;
        std::io::Write::write_all(w, b"\n")?;
        Ok(())
    })
}
