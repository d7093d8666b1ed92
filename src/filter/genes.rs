//! Per-file gene qualification

use std::collections::BTreeSet;

use crate::data::{is_valid_symbol, ExpressionRow, FilterCriteria};
use crate::error::Result;

/// Genes of one file that passed every filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualifyingSet {
    /// Case-normalized symbols
    pub genes: BTreeSet<String>,
    /// Usable rows examined
    pub rows_scanned: usize,
}

impl QualifyingSet {
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }
}

/// Whether a single row passes the FDR, expression and direction filters
pub fn row_qualifies(row: &ExpressionRow, criteria: &FilterCriteria) -> bool {
    if !is_valid_symbol(&row.gene) {
        return false;
    }
    if !(row.fdr.is_finite() && row.control.is_finite() && row.experimental.is_finite()) {
        return false;
    }
    // Strict comparison: an FDR equal to the cutoff is kept
    if row.fdr > criteria.max_fdr {
        return false;
    }
    if row.max_expression() < criteria.min_expression {
        return false;
    }
    criteria.direction.admits(row.control, row.experimental)
}

/// Collect the qualifying genes from a stream of rows.
///
/// The first row error stops the scan and is returned.
pub fn qualifying_genes<I>(rows: I, criteria: &FilterCriteria) -> Result<QualifyingSet>
where
    I: IntoIterator<Item = Result<ExpressionRow>>,
{
    let mut set = QualifyingSet::default();
    for row in rows {
        let row = row?;
        set.rows_scanned += 1;
        if row_qualifies(&row, criteria) {
            set.genes.insert(criteria.case.normalize(&row.gene));
        }
    }
    Ok(set)
}
