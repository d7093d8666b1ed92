//! bgi2gsea command-line interface

use clap::Parser;
use log::{info, LevelFilter};

use bgi2gsea::cli::{help_request, normalize_args, Cli, HelpRequest};
use bgi2gsea::prelude::*;
use bgi2gsea::run_pipeline_with_report;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args = normalize_args(std::env::args());

    if args.len() == 1 {
        print_no_args();
        return;
    }
    match help_request(&args) {
        Some(HelpRequest::Long) => {
            print_long_help();
            return;
        }
        Some(HelpRequest::Short) => {
            print_short_help();
            return;
        }
        Some(HelpRequest::Version) => {
            println!("bgi2gsea {}", VERSION);
            return;
        }
        None => {}
    }

    let cli = Cli::parse_from(args);

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_no_args() {
    println!("bgi2gsea v{}", VERSION);
    println!("Run `bgi2gsea -h` for usage or `bgi2gsea --help` for detailed information.");
}

fn print_short_help() {
    println!("bgi2gsea v{}", VERSION);
    println!();
    println!("Usage: bgi2gsea --files <PATH>... --direction <DIRECTION> [OPTIONS]");
    println!();
    println!("Options:");
    println!("      --files <PATH>...             BGI result files (tab- or comma-delimited)");
    println!("      --direction <DIRECTION>       higher | lower | either");
    println!("      --minimum-expression <VALUE>  Minimum of max(control, experimental) [default: 0]");
    println!("      --fdr <VALUE>                 Maximum FDR, inclusive [default: 0.05]");
    println!("      --case <CASE>                 upper | original [default: upper]");
    println!("  -n <N>                            Files a gene must qualify in [default: all]");
    println!("      --missing <POLICY>            nan | error [default: nan]");
    println!("  -o, --outdir <DIR>                Output directory [default: .]");
    println!();
    println!("Run `bgi2gsea --help` for detailed information.");
}

fn print_long_help() {
    println!("bgi2gsea v{}", VERSION);
    println!("Convert BGI differential expression tables into GSEA res/cls files");
    println!();
    println!("Each input file compares one control and one experimental sample. Genes are");
    println!("filtered per file by FDR, expression level and direction of change; genes that");
    println!("qualify in at least -n files are written to resfile.txt (experimental columns");
    println!("first, then control columns) together with clsfile.cls.");
    println!();
    println!("Usage: bgi2gsea --files <PATH>... --direction <DIRECTION> [OPTIONS]");
    println!();
    println!("Input:");
    println!("  --files <PATH>...    BGI differential expression result files");
    println!("                         Column 2 = control, column 3 = experimental,");
    println!("                         column 5 = FDR, column 8 = gene symbol (0-based)");
    println!("                         Tab or comma delimiters and an optional header");
    println!("                         are auto-detected");
    println!();
    println!("Filtering:");
    println!("  --direction <DIRECTION>        Required direction of change");
    println!("                                   higher: experimental >= control");
    println!("                                   lower:  experimental <= control");
    println!("                                   either: no directional filter");
    println!("  --minimum-expression <VALUE>   Minimum of max(control, experimental) [default: 0]");
    println!("  --fdr <VALUE>                  Maximum FDR, inclusive [default: 0.05]");
    println!("  --case <CASE>                  Gene symbol case: upper, original [default: upper]");
    println!("  -n <N>                         Minimum number of files a gene must qualify in");
    println!("                                   [default: all files]");
    println!("  --missing <POLICY>             Selected gene absent from a file [default: nan]");
    println!("                                   nan:   write NaN for that file's columns");
    println!("                                   error: stop without writing output");
    println!();
    println!("Output:");
    println!("  -o, --outdir <DIR>      Directory for resfile.txt and clsfile.cls [default: .]");
    println!("      --report <PATH>     Also write a JSON run summary");
    println!();
    println!("Global Options:");
    println!("  -t, --threads <N>    Number of threads, 0 = auto [default: 0]");
    println!("  -v, --verbose        Enable verbose output");
    println!("  -h                   Print short help");
    println!("      --help           Print detailed help");
    println!("  -V, --version        Print version");
    println!();
    println!("Examples:");
    println!("  # Genes up in the experimental sample of every file");
    println!("  bgi2gsea --files liver.txt lung.txt --direction higher");
    println!();
    println!("  # Down-regulated in at least two of three files, stricter FDR");
    println!("  bgi2gsea --files a.txt b.txt c.txt --direction lower --fdr 0.01 -n 2");
    println!();
    println!("  # Legacy single-dash spelling");
    println!("  bgi2gsea -files a.txt b.txt -direction either -minimum_expression 5");
}

fn run(cli: &Cli) -> Result<()> {
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let criteria = cli.criteria();
    info!(
        "Converting {} files (direction: {}, FDR <= {}, min expression: {}, n = {})",
        cli.files.len(),
        criteria.direction,
        criteria.max_fdr,
        criteria.min_expression,
        criteria.min_files
    );

    let summary = match &cli.report {
        Some(report) => run_pipeline_with_report(&cli.files, &criteria, &cli.outdir, report)?,
        None => run_pipeline(&cli.files, &criteria, &cli.outdir)?,
    };

    info!("{}", summary);
    info!("Done!");
    Ok(())
}
