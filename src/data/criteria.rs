//! Filtering configuration shared by every stage of the pipeline

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Required direction of change between control and experimental samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Experimental expression at least as high as control
    #[value(name = "higher", alias = "up")]
    Up,
    /// Experimental expression at most as high as control
    #[value(name = "lower", alias = "down")]
    Down,
    /// No directional requirement
    #[value(name = "either")]
    Either,
}

impl Direction {
    /// Whether a control/experimental pair moves in this direction.
    /// Equal values pass for every direction.
    pub fn admits(&self, control: f64, experimental: f64) -> bool {
        match self {
            Direction::Up => control <= experimental,
            Direction::Down => control >= experimental,
            Direction::Either => true,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Either => "either",
        };
        write!(f, "{}", label)
    }
}

/// How gene symbols are compared and written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Fold symbols to upper case
    #[default]
    Upper,
    /// Keep symbols as written in the input
    Original,
}

impl CaseMode {
    pub fn normalize(&self, symbol: &str) -> String {
        match self {
            CaseMode::Upper => symbol.to_uppercase(),
            CaseMode::Original => symbol.to_string(),
        }
    }
}

/// What to write when a selected gene has no row in one of the input files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Keep the column and write NaN for both values
    #[default]
    Nan,
    /// Abort the run
    Error,
}

/// Immutable filter settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Rows whose larger expression value is below this are dropped
    pub min_expression: f64,
    pub direction: Direction,
    /// Rows with FDR strictly above this are dropped
    pub max_fdr: f64,
    pub case: CaseMode,
    /// Number of files a gene must qualify in to be selected
    pub min_files: usize,
    pub missing: MissingPolicy,
}

impl FilterCriteria {
    /// Default minimum expression
    pub const DEFAULT_MIN_EXPRESSION: f64 = 0.0;
    /// Default maximum FDR
    pub const DEFAULT_MAX_FDR: f64 = 0.05;

    /// Criteria with default thresholds; the quorum defaults to every file
    pub fn new(direction: Direction, n_files: usize) -> Self {
        Self {
            min_expression: Self::DEFAULT_MIN_EXPRESSION,
            direction,
            max_fdr: Self::DEFAULT_MAX_FDR,
            case: CaseMode::default(),
            min_files: n_files,
            missing: MissingPolicy::default(),
        }
    }

    pub fn with_min_expression(mut self, min_expression: f64) -> Self {
        self.min_expression = min_expression;
        self
    }

    pub fn with_max_fdr(mut self, max_fdr: f64) -> Self {
        self.max_fdr = max_fdr;
        self
    }

    pub fn with_case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }

    /// Override the quorum; `None` keeps the current value
    pub fn with_min_files(mut self, min_files: Option<usize>) -> Self {
        if let Some(n) = min_files {
            self.min_files = n;
        }
        self
    }

    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Check the settings against the number of input files
    pub fn validate(&self, n_files: usize) -> Result<()> {
        if n_files == 0 {
            return Err(PrepError::InvalidInput {
                reason: "at least one input file is required".to_string(),
            });
        }
        if !self.min_expression.is_finite() {
            return Err(PrepError::InvalidInput {
                reason: format!("minimum expression must be finite, got {}", self.min_expression),
            });
        }
        if !self.max_fdr.is_finite() {
            return Err(PrepError::InvalidInput {
                reason: format!("FDR cutoff must be finite, got {}", self.max_fdr),
            });
        }
        if self.min_files == 0 {
            return Err(PrepError::InvalidInput {
                reason: "-n must be at least 1".to_string(),
            });
        }
        if self.min_files > n_files {
            log::warn!(
                "-n is {} but only {} files were given; no gene can be selected",
                self.min_files,
                n_files
            );
        }
        Ok(())
    }
}
