//! Gene filtering and cross-file selection

mod genes;
mod quorum;

pub use genes::{qualifying_genes, row_qualifies, QualifyingSet};
pub use quorum::{occurrence_counts, select_genes, SelectedGenes};
