use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pairs::{tokenize, vm};
use tracing::info;

#[derive(Parser)]
#[command(name = "pairs", about = "Interpreter for the Pairs esoteric language", version)]
struct Cli {
    /// Source file of 16-character tokens.
    filename: PathBuf,

    /// Print a listing of the decoded program instead of running it.
    #[arg(long)]
    disassemble: bool,

    /// Log filter for diagnostics on stderr (e.g. debug, pairs=trace).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    // Usage errors exit 1 rather than clap's default of 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => e.exit(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli.filename, cli.disassemble) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, disassemble: bool) -> Result<()> {
    let source =
        std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    let program = tokenize(&source)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if disassemble {
        out.write_all(program.disassemble().as_bytes())?;
        return Ok(());
    }

    let outcome = vm::run(&program, &mut out)?;
    out.flush()?;
    info!(steps = outcome.steps, "program halted");
    Ok(())
}
