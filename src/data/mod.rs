//! Data structures for the conversion pipeline

mod criteria;
mod row;

pub use criteria::{CaseMode, Direction, FilterCriteria, MissingPolicy};
pub use row::{
    is_valid_symbol, ExpressionRow, CONTROL_COL, EXPERIMENTAL_COL, FDR_COL, GENE_COL, MIN_FIELDS,
};
