//! Input/Output for BGI tables and GSEA files

pub mod gsea;
mod reader;
mod report;

pub use gsea::{
    phenotype_labels, write_cls, write_outputs, write_res, OutputPaths, CLS_FILE, RES_FILE,
};
pub use reader::{detect_format, read_rows, Delimiter, RowReader, TableFormat, MIN_FORMAT_FIELDS};
pub use report::{write_summary, FileSummary, RunSummary};
