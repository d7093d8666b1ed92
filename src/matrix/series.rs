//! Per-gene value series gathered from every input file

use std::path::Path;

use rayon::prelude::*;

use crate::data::CaseMode;
use crate::error::Result;
use crate::filter::SelectedGenes;
use crate::io::read_rows;

/// Control and experimental values of one gene, one slot per input file
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSeries {
    pub control: Vec<Option<f64>>,
    pub experimental: Vec<Option<f64>>,
}

impl ValueSeries {
    pub fn new(n_files: usize) -> Self {
        Self {
            control: vec![None; n_files],
            experimental: vec![None; n_files],
        }
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.control.len()
    }

    pub fn is_empty(&self) -> bool {
        self.control.is_empty()
    }

    /// Whether the gene was found in a given file
    pub fn is_present(&self, file_idx: usize) -> bool {
        self.control[file_idx].is_some()
    }

    /// Indices of files that had no row for this gene
    pub fn missing_files(&self) -> Vec<usize> {
        (0..self.len()).filter(|&j| !self.is_present(j)).collect()
    }
}

/// `(control, experimental)` for every selected gene found in one file,
/// indexed like `selected`
fn file_values<P: AsRef<Path>>(
    path: P,
    selected: &SelectedGenes,
    case: CaseMode,
) -> Result<Vec<Option<(f64, f64)>>> {
    let rows = read_rows(path)?;
    let file = rows.path().to_string();
    let mut values = vec![None; selected.len()];
    for row in rows {
        let row = row?;
        let gene = case.normalize(&row.gene);
        let Some(idx) = selected.index_of(&gene) else {
            continue;
        };
        if values[idx].is_some() {
            log::warn!(
                "{}:{}: duplicate row for {}, keeping the first one",
                file,
                row.line,
                gene
            );
            continue;
        }
        values[idx] = Some((row.control, row.experimental));
    }
    Ok(values)
}

/// Re-read every file and collect the values of the selected genes.
///
/// No filtering is applied in this pass. Files are scanned in parallel and
/// the result keeps the order of `files`.
pub fn collect_series<P>(files: &[P], selected: &SelectedGenes, case: CaseMode) -> Result<Vec<ValueSeries>>
where
    P: AsRef<Path> + Sync,
{
    let per_file: Vec<Vec<Option<(f64, f64)>>> = files
        .par_iter()
        .map(|path| file_values(path, selected, case))
        .collect::<Result<_>>()?;

    let mut series = vec![ValueSeries::new(files.len()); selected.len()];
    for (file_idx, values) in per_file.into_iter().enumerate() {
        for (gene_idx, value) in values.into_iter().enumerate() {
            if let Some((control, experimental)) = value {
                series[gene_idx].control[file_idx] = Some(control);
                series[gene_idx].experimental[file_idx] = Some(experimental);
            }
        }
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn table(rows: &[(&str, f64, f64)]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id\tlen\tctrl\ttreat\tlfc\tfdr\tud\tp\tsymbol").unwrap();
        for (i, (gene, ctrl, exp)) in rows.iter().enumerate() {
            writeln!(file, "{}\t1\t{}\t{}\t0\t0.9\tx\t1\t{}", i, ctrl, exp, gene).unwrap();
        }
        file
    }

    #[test]
    fn test_values_ignore_filters_and_keep_file_order() {
        let a = table(&[("tp53", 1.0, 2.0), ("MYC", 3.0, 4.0)]);
        let b = table(&[("MYC", 5.0, 6.0), ("TP53", 7.0, 8.0)]);
        let selected: SelectedGenes = vec!["MYC".to_string(), "TP53".to_string()].into_iter().collect();

        let series = collect_series(&[a.path(), b.path()], &selected, CaseMode::Upper).unwrap();
        assert_eq!(series.len(), 2);
        // MYC
        assert_eq!(series[0].control, vec![Some(3.0), Some(5.0)]);
        assert_eq!(series[0].experimental, vec![Some(4.0), Some(6.0)]);
        // TP53, matched case-insensitively in file a
        assert_eq!(series[1].control, vec![Some(1.0), Some(7.0)]);
        assert_eq!(series[1].experimental, vec![Some(2.0), Some(8.0)]);
    }

    #[test]
    fn test_missing_gene_leaves_empty_slot() {
        let a = table(&[("TP53", 1.0, 2.0)]);
        let b = table(&[("MYC", 5.0, 6.0)]);
        let selected: SelectedGenes = vec!["TP53".to_string()].into_iter().collect();

        let series = collect_series(&[a.path(), b.path()], &selected, CaseMode::Upper).unwrap();
        assert_eq!(series[0].len(), 2);
        assert!(series[0].is_present(0));
        assert_eq!(series[0].missing_files(), vec![1]);
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let a = table(&[("TP53", 1.0, 2.0), ("TP53", 9.0, 9.0)]);
        let selected: SelectedGenes = vec!["TP53".to_string()].into_iter().collect();

        let series = collect_series(&[a.path()], &selected, CaseMode::Upper).unwrap();
        assert_eq!(series[0].control, vec![Some(1.0)]);
    }
}
