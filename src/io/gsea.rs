//! Writers for the GSEA expression (res) and phenotype (cls) formats

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{PrepError, Result};
use crate::matrix::ExpressionMatrix;

/// File name of the expression matrix
pub const RES_FILE: &str = "resfile.txt";
/// File name of the phenotype labels
pub const CLS_FILE: &str = "clsfile.cls";

/// Class label of the experimental samples
pub const EXPERIMENTAL_CLASS: &str = "tumor";
/// Class label of the control samples
pub const CONTROL_CLASS: &str = "normal";

/// Placeholder written in the DESCRIPTION column
const DESCRIPTION_PLACEHOLDER: &str = "na";

/// Paths of the two output artifacts inside an output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub res: PathBuf,
    pub cls: PathBuf,
}

impl OutputPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            res: dir.join(RES_FILE),
            cls: dir.join(CLS_FILE),
        }
    }
}

/// Phenotype vector for `n_files` inputs: experimental block (`0`) then control block (`1`)
pub fn phenotype_labels(n_files: usize) -> Vec<u8> {
    let mut labels = vec![0u8; n_files];
    labels.extend(std::iter::repeat(1u8).take(n_files));
    labels
}

/// Write the expression matrix in GSEA res layout
pub fn write_res_to<W: Write>(writer: &mut W, matrix: &ExpressionMatrix) -> Result<()> {
    write!(writer, "NAME\tDESCRIPTION")?;
    for column in matrix.columns() {
        write!(writer, "\t{}", column)?;
    }
    writeln!(writer)?;

    for (gene, row) in matrix.genes().iter().zip(matrix.values().rows()) {
        write!(writer, "{}\t{}", gene, DESCRIPTION_PLACEHOLDER)?;
        for value in row.iter() {
            write!(writer, "\t{}", value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the phenotype label file for `n_files` inputs
pub fn write_cls_to<W: Write>(writer: &mut W, n_files: usize) -> Result<()> {
    let labels = phenotype_labels(n_files);
    writeln!(writer, "{} 2 1", labels.len())?;
    writeln!(writer, "# {} {}", EXPERIMENTAL_CLASS, CONTROL_CLASS)?;
    let tokens: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
    writeln!(writer, "{}", tokens.join(" "))?;
    Ok(())
}

/// Output written to a temporary sibling, not yet moved into place
pub struct StagedFile {
    tmp: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    /// Rename the temporary file over the target path
    pub fn commit(self) -> Result<()> {
        self.tmp
            .persist(&self.path)
            .map_err(|e| PrepError::IoError(e.error))?;
        Ok(())
    }
}

/// Write a file's content to a temporary sibling of `path`
pub fn stage<P, F>(path: P, write: F) -> Result<StagedFile>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<&mut fs::File>) -> Result<()>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(StagedFile {
        tmp,
        path: path.to_path_buf(),
    })
}

/// Write a file through a temporary sibling that is renamed into place
pub fn write_atomic<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<&mut fs::File>) -> Result<()>,
{
    stage(path, write)?.commit()
}

/// Write `resfile.txt`
pub fn write_res<P: AsRef<Path>>(path: P, matrix: &ExpressionMatrix) -> Result<()> {
    write_atomic(path, |w| write_res_to(w, matrix))
}

/// Write `clsfile.cls`
pub fn write_cls<P: AsRef<Path>>(path: P, n_files: usize) -> Result<()> {
    write_atomic(path, |w| write_cls_to(w, n_files))
}

/// Write both GSEA files. Neither target is touched unless both were
/// written out completely.
pub fn write_outputs(paths: &OutputPaths, matrix: &ExpressionMatrix, n_files: usize) -> Result<()> {
    let res = stage(&paths.res, |w| write_res_to(w, matrix))?;
    let cls = stage(&paths.cls, |w| write_cls_to(w, n_files))?;
    res.commit()?;
    cls.commit()
}
