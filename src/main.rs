//! Command line interface for cross-referencing ClinVar with AncestryDNA data.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

use clinvar_ancestry::{DEFAULT_OUTPUT, MatchOptions, RunConfig, run};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Extract ClinVar data for the rsIDs found in an AncestryDNA raw data file"
)]
struct Cli {
    /// Path to the ClinVar VCF file.
    clinvar: PathBuf,

    /// Path to the AncestryDNA raw data file.
    genotypes: PathBuf,

    /// Regular expression that must match the whole GENEINFO value.
    #[arg(long)]
    gene: Option<String>,

    /// Only report rows that disagree with the ClinVar reference allele.
    #[arg(long)]
    discrepancies: bool,

    /// Also log rows whose rsID has no ClinVar entry.
    #[arg(long)]
    unmatched_rsid: bool,

    /// Path of the JSON output file.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Verbosity of the program
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        RunConfig {
            clinvar: self.clinvar,
            genotypes: self.genotypes,
            gene_pattern: self.gene,
            options: MatchOptions {
                only_discrepancies: self.discrepancies,
                report_unmatched: self.unmatched_rsid,
            },
            output: self.output,
        }
    }
}

/// Usage errors exit with 1, `--help` and `--version` with 0.
fn exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { 1 } else { 0 }
}

fn main() -> Result<ExitCode, anyhow::Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            return Ok(ExitCode::from(exit_code(&err)));
        }
    };

    // Diagnostics go to stderr; stdout carries the match log.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_max_level(match cli.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::ERROR,
        })
        .compact()
        .finish();

    let config = cli.into_config();

    tracing::subscriber::with_default(collector, || {
        let stdout = io::stdout();
        let mut log = BufWriter::new(stdout.lock());
        run(&config, &mut log)?;
        Ok::<(), anyhow::Error>(())
    })?;

    Ok(ExitCode::SUCCESS)
}
