use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ld_docgen::{DocumentGenerator, decode_request, log};

/// Generates a document from a JSON generate-document event.
#[derive(Parser)]
#[command(name = "luadoc-gen", version, about)]
struct Cli {
    /// Path of the JSON event file carrying the request.
    request: PathBuf,

    /// Directory holding the LuaLaTeX templates.
    #[arg(long, default_value = "run")]
    template_dir: PathBuf,

    /// Directory to create per-request working directories in.
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Write logs to `docgen.log` in this directory instead of stderr.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Also copy the produced PDF (or the failure log) here.
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = match &cli.log_dir {
        Some(directory) => Some(log::init_file_logging(directory)?),
        None => {
            log::init_stderr_logging()?;
            None
        }
    };

    let payload = std::fs::read(&cli.request)
        .with_context(|| format!("failed to read request file `{}`", cli.request.display()))?;
    let request = decode_request(&payload)?;

    let mut generator = DocumentGenerator::new(cli.template_dir, cli.work_dir);
    if let Some(debug_dir) = cli.debug_dir {
        generator = generator.with_debug_dir(debug_dir);
    }

    let generated = generator.generate(&request)?;
    println!("{}", generated.pdf.display());
    Ok(())
}
