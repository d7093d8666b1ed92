//! Expression matrix assembly
//!
//! The matrix has one row per selected gene. Its columns are the experimental
//! values of every file in input order, followed by the control values in the
//! same order. The phenotype labels written alongside rely on this layout.

mod series;

use std::path::Path;

use ndarray::Array2;

pub use series::{collect_series, ValueSeries};

use crate::data::{FilterCriteria, MissingPolicy};
use crate::error::{PrepError, Result};
use crate::filter::SelectedGenes;

/// Genes x samples expression values ready for GSEA
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    genes: Vec<String>,
    columns: Vec<String>,
    values: Array2<f64>,
    n_missing: usize,
}

impl ExpressionMatrix {
    /// Lay out per-gene series as rows of the output matrix.
    ///
    /// `labels` names the input files; missing slots are resolved by `missing`.
    pub fn from_series(
        selected: &SelectedGenes,
        series: &[ValueSeries],
        labels: &[String],
        missing: MissingPolicy,
    ) -> Result<Self> {
        if series.len() != selected.len() {
            return Err(PrepError::InvalidInput {
                reason: format!(
                    "{} value series for {} selected genes",
                    series.len(),
                    selected.len()
                ),
            });
        }

        let n_files = labels.len();
        let mut values = Array2::from_elem((selected.len(), 2 * n_files), f64::NAN);
        let mut n_missing = 0usize;

        for (gene_idx, (gene, s)) in selected.iter().zip(series).enumerate() {
            if s.len() != n_files {
                return Err(PrepError::InvalidInput {
                    reason: format!("{} has {} values, expected {}", gene, s.len(), n_files),
                });
            }
            for file_idx in 0..n_files {
                match (s.experimental[file_idx], s.control[file_idx]) {
                    (Some(experimental), Some(control)) => {
                        values[[gene_idx, file_idx]] = experimental;
                        values[[gene_idx, n_files + file_idx]] = control;
                    }
                    _ => match missing {
                        MissingPolicy::Error => {
                            return Err(PrepError::GeneMissing {
                                gene: gene.to_string(),
                                path: labels[file_idx].clone(),
                            });
                        }
                        MissingPolicy::Nan => {
                            log::debug!("{} missing in {}, writing NaN", gene, labels[file_idx]);
                            n_missing += 1;
                        }
                    },
                }
            }
        }

        if n_missing > 0 {
            log::warn!(
                "{} gene/file combinations had no row; written as NaN",
                n_missing
            );
        }

        let columns = labels
            .iter()
            .map(|label| format!("{}_experimental", label))
            .chain(labels.iter().map(|label| format!("{}_control", label)))
            .collect();

        Ok(Self {
            genes: selected.as_slice().to_vec(),
            columns,
            values,
            n_missing,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.values.nrows()
    }

    /// Number of value columns (twice the number of files)
    pub fn n_columns(&self) -> usize {
        self.values.ncols()
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Gene/file combinations filled with NaN
    pub fn n_missing(&self) -> usize {
        self.n_missing
    }
}

/// Label used for a file in column names
pub fn file_label<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().display().to_string()
}

/// Re-read the inputs and build the output matrix for the selected genes
pub fn build_matrix<P>(
    files: &[P],
    selected: &SelectedGenes,
    criteria: &FilterCriteria,
) -> Result<ExpressionMatrix>
where
    P: AsRef<Path> + Sync,
{
    let series = collect_series(files, selected, criteria.case)?;
    let labels: Vec<String> = files.iter().map(file_label).collect();
    ExpressionMatrix::from_series(selected, &series, &labels, criteria.missing)
}
