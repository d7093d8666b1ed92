//! bgi2gsea: convert BGI differential expression tables for GSEA
//!
//! Each input file holds one control vs. experimental comparison. Genes are
//! filtered per file by FDR, expression level and direction of change, kept if
//! they qualify in enough files, and written out as a GSEA expression matrix
//! (`resfile.txt`) with a matching phenotype file (`clsfile.cls`).
//!
//! # Example
//!
//! ```ignore
//! use bgi2gsea::prelude::*;
//!
//! let files = vec!["liver.txt", "lung.txt"];
//! let criteria = FilterCriteria::new(Direction::Up, files.len()).with_max_fdr(0.01);
//!
//! let summary = run_pipeline(&files, &criteria, ".")?;
//! println!("{}", summary);
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod filter;
pub mod io;
pub mod matrix;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::data::{CaseMode, Direction, ExpressionRow, FilterCriteria, MissingPolicy};
    pub use crate::error::{PrepError, Result};
    pub use crate::filter::{qualifying_genes, select_genes, QualifyingSet, SelectedGenes};
    pub use crate::io::{read_rows, write_cls, write_res, OutputPaths, RunSummary};
    pub use crate::matrix::{build_matrix, ExpressionMatrix, ValueSeries};
    pub use crate::{run_pipeline, Conversion};
}

use std::path::Path;

use rayon::prelude::*;

use io::{write_outputs, write_summary, FileSummary};
use matrix::file_label;
use prelude::*;

/// Everything computed by a run, before anything is written
#[derive(Debug, Clone)]
pub struct Conversion {
    pub criteria: FilterCriteria,
    /// Input labels and their qualifying sets, in input order
    pub qualifying: Vec<(String, QualifyingSet)>,
    pub selected: SelectedGenes,
    pub matrix: ExpressionMatrix,
}

impl Conversion {
    /// Filter every file, combine the results and build the output matrix
    pub fn prepare<P>(files: &[P], criteria: &FilterCriteria) -> Result<Self>
    where
        P: AsRef<Path> + Sync,
    {
        criteria.validate(files.len())?;
        for path in files {
            if !path.as_ref().is_file() {
                return Err(PrepError::MissingFile {
                    path: file_label(path),
                });
            }
        }

        let sets: Vec<QualifyingSet> = files
            .par_iter()
            .map(|path| qualifying_genes(read_rows(path)?, criteria))
            .collect::<Result<_>>()?;

        let qualifying: Vec<(String, QualifyingSet)> =
            files.iter().map(file_label).zip(sets).collect();
        for (label, set) in &qualifying {
            log::info!(
                "{}: {} of {} genes qualify (direction: {})",
                label,
                set.len(),
                set.rows_scanned,
                criteria.direction
            );
        }

        let selected = select_genes(qualifying.iter().map(|(_, set)| set), criteria.min_files);
        if selected.is_empty() {
            log::warn!("No gene passed the filters in enough files; output will have no gene rows");
        }

        let matrix = build_matrix(files, &selected, criteria)?;

        Ok(Self {
            criteria: criteria.clone(),
            qualifying,
            selected,
            matrix,
        })
    }

    pub fn n_files(&self) -> usize {
        self.qualifying.len()
    }

    /// Write `resfile.txt` and `clsfile.cls`
    pub fn write(&self, paths: &OutputPaths) -> Result<()> {
        log::info!(
            "Writing expression matrix to: {}, phenotype labels to: {}",
            paths.res.display(),
            paths.cls.display()
        );
        write_outputs(paths, &self.matrix, self.n_files())
    }

    pub fn summary(&self, paths: &OutputPaths) -> RunSummary {
        RunSummary {
            criteria: self.criteria.clone(),
            files: self
                .qualifying
                .iter()
                .map(|(label, set)| FileSummary {
                    path: label.clone(),
                    rows: set.rows_scanned,
                    qualifying_genes: set.len(),
                })
                .collect(),
            selected_genes: self.selected.len(),
            missing_values: self.matrix.n_missing(),
            res_file: paths.res.display().to_string(),
            cls_file: paths.cls.display().to_string(),
        }
    }
}

/// Run the complete conversion and write both GSEA files into `outdir`
pub fn run_pipeline<P, D>(files: &[P], criteria: &FilterCriteria, outdir: D) -> Result<RunSummary>
where
    P: AsRef<Path> + Sync,
    D: AsRef<Path>,
{
    let outdir = outdir.as_ref();
    if !outdir.is_dir() {
        return Err(PrepError::InvalidInput {
            reason: format!("output directory {} does not exist", outdir.display()),
        });
    }

    let conversion = Conversion::prepare(files, criteria)?;
    let paths = OutputPaths::in_dir(outdir);
    conversion.write(&paths)?;
    Ok(conversion.summary(&paths))
}

/// Like [`run_pipeline`], also writing the run summary as JSON
pub fn run_pipeline_with_report<P, D, R>(
    files: &[P],
    criteria: &FilterCriteria,
    outdir: D,
    report: R,
) -> Result<RunSummary>
where
    P: AsRef<Path> + Sync,
    D: AsRef<Path>,
    R: AsRef<Path>,
{
    let summary = run_pipeline(files, criteria, outdir)?;
    log::info!("Writing run summary to: {}", report.as_ref().display());
    write_summary(report, &summary)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{CLS_FILE, RES_FILE};
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    const HEADER: &str = "GeneID\tLength\tControl\tTreated\tlog2Ratio\tFDR\tUp-Down\tPvalue\tSymbol";

    /// Write a BGI table with rows (symbol, control, experimental, fdr)
    fn bgi_table(dir: &Path, name: &str, rows: &[(&str, f64, f64, f64)]) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for (i, (gene, ctrl, exp, fdr)) in rows.iter().enumerate() {
            writeln!(file, "{}\t1000\t{}\t{}\t0\t{}\t-\t0.001\t{}", i, ctrl, exp, fdr, gene).unwrap();
        }
        path
    }

    #[test]
    fn test_full_pipeline_intersection() {
        let dir = tempfile::tempdir().unwrap();
        // A qualifies TP53 and MYC, B qualifies TP53 and EGFR
        let a = bgi_table(
            dir.path(),
            "a.txt",
            &[
                ("TP53", 10.0, 20.0, 0.01),
                ("MYC", 5.0, 50.0, 0.001),
                ("EGFR", 5.0, 50.0, 0.5),
            ],
        );
        let b = bgi_table(
            dir.path(),
            "b.txt",
            &[
                ("TP53", 12.0, 30.0, 0.02),
                ("MYC", 50.0, 5.0, 0.001),
                ("EGFR", 1.0, 9.0, 0.0),
            ],
        );

        let files = vec![a.clone(), b.clone()];
        let criteria = FilterCriteria::new(Direction::Up, files.len());
        let summary = run_pipeline(&files, &criteria, dir.path()).unwrap();
        assert_eq!(summary.selected_genes, 1);
        assert_eq!(summary.files[0].qualifying_genes, 2);
        assert_eq!(summary.files[1].qualifying_genes, 2);

        let res = fs::read_to_string(dir.path().join(RES_FILE)).unwrap();
        let lines: Vec<&str> = res.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!(
                "NAME\tDESCRIPTION\t{a}_experimental\t{b}_experimental\t{a}_control\t{b}_control",
                a = a.display(),
                b = b.display()
            )
        );
        assert_eq!(lines[1], "TP53\tna\t20\t30\t10\t12");

        let cls = fs::read_to_string(dir.path().join(CLS_FILE)).unwrap();
        assert_eq!(cls, "4 2 1\n# tumor normal\n0 0 1 1\n");
    }

    #[test]
    fn test_quorum_one_is_union_with_nan_for_missing() {
        let dir = tempfile::tempdir().unwrap();
        let a = bgi_table(dir.path(), "a.txt", &[("TP53", 1.0, 2.0, 0.01)]);
        let b = bgi_table(dir.path(), "b.txt", &[("EGFR", 1.0, 2.0, 0.01)]);

        let files = vec![a, b];
        let criteria = FilterCriteria::new(Direction::Either, files.len()).with_min_files(Some(1));
        let conversion = Conversion::prepare(&files, &criteria).unwrap();
        assert_eq!(conversion.selected.as_slice(), &["EGFR".to_string(), "TP53".to_string()]);
        assert_eq!(conversion.matrix.n_columns(), 4);
        assert_eq!(conversion.matrix.n_missing(), 2);
    }

    #[test]
    fn test_missing_gene_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = bgi_table(dir.path(), "a.txt", &[("TP53", 1.0, 2.0, 0.01)]);
        let b = bgi_table(dir.path(), "b.txt", &[("EGFR", 1.0, 2.0, 0.01)]);

        let files = vec![a, b];
        let criteria = FilterCriteria::new(Direction::Either, files.len())
            .with_min_files(Some(1))
            .with_missing(MissingPolicy::Error);
        let err = run_pipeline(&files, &criteria, dir.path()).unwrap_err();
        assert!(matches!(err, PrepError::GeneMissing { .. }));
        assert!(!dir.path().join(RES_FILE).exists());
        assert!(!dir.path().join(CLS_FILE).exists());
    }

    #[test]
    fn test_bad_format_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let good = bgi_table(dir.path(), "good.txt", &[("TP53", 1.0, 2.0, 0.01)]);
        let bad = dir.path().join("bad.txt");
        fs::write(&bad, "a b c\n1 2 3\n").unwrap();

        let files = vec![good, bad];
        let criteria = FilterCriteria::new(Direction::Up, files.len());
        let err = run_pipeline(&files, &criteria, dir.path()).unwrap_err();
        assert!(matches!(err, PrepError::UnknownFormat { .. }));
        assert!(!dir.path().join(RES_FILE).exists());
    }

    #[test]
    fn test_nan_fdr_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let a = bgi_table(dir.path(), "a.txt", &[("TP53", 1.0, 2.0, f64::NAN)]);

        let files = vec![a];
        let criteria = FilterCriteria::new(Direction::Up, 1);
        let err = run_pipeline(&files, &criteria, dir.path()).unwrap_err();
        assert!(matches!(err, PrepError::MalformedRow { line: 2, .. }));
        assert!(!dir.path().join(RES_FILE).exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![dir.path().join("nope.txt")];
        let criteria = FilterCriteria::new(Direction::Up, 1);
        let err = Conversion::prepare(&files, &criteria).unwrap_err();
        assert!(matches!(err, PrepError::MissingFile { .. }));
    }

    #[test]
    fn test_report_written() {
        let dir = tempfile::tempdir().unwrap();
        let a = bgi_table(dir.path(), "a.txt", &[("tp53", 1.0, 2.0, 0.01)]);
        let report = dir.path().join("run.json");

        let files = vec![a];
        let criteria = FilterCriteria::new(Direction::Up, 1);
        let summary = run_pipeline_with_report(&files, &criteria, dir.path(), &report).unwrap();
        assert_eq!(summary.selected_genes, 1);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["selected_genes"], 1);

        let res = fs::read_to_string(dir.path().join(RES_FILE)).unwrap();
        assert!(res.lines().nth(1).unwrap().starts_with("TP53\tna\t"));
    }
}
