//! Command-line interface for bgi2gsea

use std::path::PathBuf;

use clap::Parser;

use crate::data::{CaseMode, Direction, FilterCriteria, MissingPolicy};

/// Long option names accepted with a single leading dash
const LEGACY_FLAGS: [&str; 6] = [
    "files",
    "direction",
    "minimum_expression",
    "fdr",
    "case",
    "missing",
];

#[derive(Parser, Debug)]
#[command(name = "bgi2gsea")]
#[command(about = "Convert BGI differential expression tables into GSEA res/cls files")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// BGI result files (tab- or comma-delimited)
    #[arg(long, required = true, num_args = 1.., value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Required direction of change
    #[arg(long, value_enum)]
    pub direction: Direction,

    /// Minimum of max(control, experimental)
    #[arg(long, alias = "minimum_expression", default_value_t = FilterCriteria::DEFAULT_MIN_EXPRESSION)]
    pub minimum_expression: f64,

    /// Maximum FDR, inclusive
    #[arg(long, default_value_t = FilterCriteria::DEFAULT_MAX_FDR)]
    pub fdr: f64,

    /// Gene symbol case handling
    #[arg(long, value_enum, default_value_t = CaseMode::Upper)]
    pub case: CaseMode,

    /// Minimum number of files a gene must qualify in (all files if omitted)
    #[arg(short = 'n', value_name = "N")]
    pub n: Option<usize>,

    /// Handling of selected genes absent from a file
    #[arg(long, value_enum, default_value_t = MissingPolicy::Nan)]
    pub missing: MissingPolicy,

    /// Directory for resfile.txt and clsfile.cls
    #[arg(short, long, default_value = ".")]
    pub outdir: PathBuf,

    /// Also write a JSON run summary to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Number of threads (0 = auto)
    #[arg(short = 't', long, default_value = "0")]
    pub threads: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Filter settings described by the arguments
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.direction, self.files.len())
            .with_min_expression(self.minimum_expression)
            .with_max_fdr(self.fdr)
            .with_case(self.case)
            .with_min_files(self.n)
            .with_missing(self.missing)
    }
}

/// Informational output requested instead of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpRequest {
    /// `-h`
    Short,
    /// `--help`
    Long,
    /// `-V` / `--version`
    Version,
}

/// Find a help or version flag; `--help` wins over `-h`, which wins over `-V`
pub fn help_request<S: AsRef<str>>(args: &[S]) -> Option<HelpRequest> {
    let has = |flags: &[&str]| args.iter().skip(1).any(|a| flags.contains(&a.as_ref()));
    if has(&["--help"]) {
        Some(HelpRequest::Long)
    } else if has(&["-h"]) {
        Some(HelpRequest::Short)
    } else if has(&["-V", "--version"]) {
        Some(HelpRequest::Version)
    } else {
        None
    }
}

/// Rewrite legacy `-files`-style options to `--files`
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| match arg.strip_prefix('-') {
            Some(name) if !name.starts_with('-') && LEGACY_FLAGS.contains(&name) => {
                format!("--{}", name)
            }
            _ => arg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_legacy_flags_rewritten() {
        let normalized = normalize_args(args("bgi2gsea -files a.txt -direction higher -n 1 -v"));
        assert_eq!(
            normalized,
            args("bgi2gsea --files a.txt --direction higher -n 1 -v")
        );
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(args("bgi2gsea --files a.txt b.txt --direction higher")).unwrap();
        let criteria = cli.criteria();
        assert_eq!(criteria.direction, Direction::Up);
        assert_eq!(criteria.min_files, 2);
        assert_eq!(criteria.max_fdr, 0.05);
        assert_eq!(criteria.min_expression, 0.0);
        assert_eq!(criteria.case, CaseMode::Upper);
        assert_eq!(criteria.missing, MissingPolicy::Nan);
        assert_eq!(cli.outdir, PathBuf::from("."));
    }

    #[test]
    fn test_parse_legacy_line() {
        let line = normalize_args(args(
            "bgi2gsea -files a.txt b.txt c.txt -direction lower -minimum_expression 5 -fdr 0.01 -case original -n 2",
        ));
        let cli = Cli::try_parse_from(line).unwrap();
        let criteria = cli.criteria();
        assert_eq!(cli.files.len(), 3);
        assert_eq!(criteria.direction, Direction::Down);
        assert_eq!(criteria.min_expression, 5.0);
        assert_eq!(criteria.max_fdr, 0.01);
        assert_eq!(criteria.case, CaseMode::Original);
        assert_eq!(criteria.min_files, 2);
    }

    #[test]
    fn test_help_flags_detected() {
        assert_eq!(help_request(&args("bgi2gsea -h")), Some(HelpRequest::Short));
        assert_eq!(help_request(&args("bgi2gsea --files a.txt --help")), Some(HelpRequest::Long));
        assert_eq!(help_request(&args("bgi2gsea -h --help")), Some(HelpRequest::Long));
        assert_eq!(help_request(&args("bgi2gsea -V")), Some(HelpRequest::Version));
        assert_eq!(help_request(&args("bgi2gsea --version")), Some(HelpRequest::Version));
        assert_eq!(help_request(&args("bgi2gsea --files a.txt --direction up")), None);
        // only whole arguments count
        assert_eq!(help_request(&args("bgi2gsea --files -help.txt --direction up")), None);
    }

    #[test]
    fn test_help_is_not_a_clap_flag() {
        assert!(Cli::try_parse_from(args("bgi2gsea --files a.txt --direction up -h")).is_err());
    }

    #[test]
    fn test_defaults_rendered_once() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        for arg in cmd.get_arguments() {
            let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            assert!(!help.contains("[default:"), "{}: {}", arg.get_id(), help);
        }
        let rendered = Cli::command().render_help().to_string();
        assert_eq!(rendered.matches("[default: 0.05]").count(), 1);
    }

    #[test]
    fn test_invalid_direction_rejected() {
        assert!(Cli::try_parse_from(args("bgi2gsea --files a.txt --direction sideways")).is_err());
        assert!(Cli::try_parse_from(args("bgi2gsea --files a.txt")).is_err());
        assert!(Cli::try_parse_from(args("bgi2gsea --direction higher")).is_err());
    }
}
