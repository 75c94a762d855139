use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use tracing_subscriber::EnvFilter;

use fmtfuzz::corpus::Corpus;
use fmtfuzz::filter::{BoringFilter, DEFAULT_BORING_PATTERN};
use fmtfuzz::generate::Backend;
use fmtfuzz::oracle::{CommandOracle, DEFAULT_SYNTAX_ERROR_PATTERN};
use fmtfuzz::report::{self, ReportConfig};
use fmtfuzz::run::{Mode, RunConfig, Runner};

#[derive(Parser)]
#[command(
    name = "fmtfuzz",
    about = "Fuzz a code formatter for idempotence and crash-freedom",
    version
)]
struct Cli {
    /// Random program generator backend
    #[arg(long, value_enum, default_value_t = Backend::Statements)]
    generator: Backend,

    /// Maximum AST depth for generated programs
    #[arg(long, default_value_t = 7)]
    max_depth: u32,

    /// Report first-pass syntax rejections instead of discarding them
    #[arg(long)]
    show_initial_parse_errors: bool,

    /// Report the first iteration even when it classifies Success
    #[arg(long)]
    show_successes: bool,

    /// Replay the persisted corpus entry instead of generating
    #[arg(long)]
    reproduce: bool,

    /// Formatter command to drive (source on stdin, options as flags)
    #[arg(long, default_value = "prettier")]
    formatter: String,

    /// Extra leading argument for the formatter command (repeatable)
    #[arg(long = "formatter-arg", allow_hyphen_values = true)]
    formatter_args: Vec<String>,

    /// Directory holding the persisted corpus files
    #[arg(long, default_value = "corpus")]
    corpus_dir: PathBuf,

    /// Regex classifying first-pass stderr as an input-syntax rejection
    #[arg(long, default_value = DEFAULT_SYNTAX_ERROR_PATTERN)]
    syntax_error_pattern: String,

    /// Regex marking generated programs as too boring to format
    #[arg(long, default_value = DEFAULT_BORING_PATTERN)]
    boring_pattern: String,
}

/// Parse leniently: unrecognized flags are warned about and dropped, never
/// fatal, so stale invocations from old notes keep working.
fn parse_lenient() -> Cli {
    let mut args: Vec<String> = std::env::args().collect();
    loop {
        match Cli::try_parse_from(&args) {
            Ok(cli) => return cli,
            Err(err) if err.kind() == ErrorKind::UnknownArgument => {
                let Some(ContextValue::String(flag)) = err.get(ContextKind::InvalidArg) else {
                    err.exit()
                };
                let flag = flag.clone();
                let prefix = format!("{flag}=");
                let Some(pos) = args.iter().position(|a| *a == flag || a.starts_with(&prefix))
                else {
                    err.exit()
                };
                eprintln!("Ignored unknown option: {flag}\n");
                args.remove(pos);
            }
            Err(err) => err.exit(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_lenient();

    let corpus = Corpus::new(&cli.corpus_dir);
    let mode = if cli.reproduce {
        let (program, options) = corpus
            .load()
            .context("cannot reproduce: no persisted corpus entry")?;
        Mode::Reproduce { program, options }
    } else {
        Mode::Fuzz
    };

    let filter = BoringFilter::new(&cli.boring_pattern)
        .with_context(|| format!("invalid --boring-pattern: {}", cli.boring_pattern))?;
    let oracle = CommandOracle::new(
        cli.formatter.as_str(),
        cli.formatter_args.clone(),
        &cli.syntax_error_pattern,
    )
    .with_context(|| format!("invalid --syntax-error-pattern: {}", cli.syntax_error_pattern))?;
    let generator = cli.generator.create();

    let config = RunConfig {
        max_depth: cli.max_depth,
        show_successes: cli.show_successes,
        show_initial_parse_errors: cli.show_initial_parse_errors,
    };

    let mut runner = Runner::new(oracle, generator, filter, config, mode);
    let result = runner.run();

    let columns = std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(80);
    let report_config = ReportConfig {
        columns,
        program_path: corpus.program_path().display().to_string(),
        formatter: cli.formatter.clone(),
        reproduce: cli.reproduce,
    };
    println!("{}", report::render(&result, &report_config));

    // Reproduction never persists; it exists to re-examine a finding
    // without clobbering it.
    if !cli.reproduce {
        corpus.store(&result).context("failed to persist corpus")?;
    }

    Ok(())
}
