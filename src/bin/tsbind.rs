#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tsbind::config::{self, TsbindConfig};
use tsbind::driver;
use tsbind::reporter::Reporter;

/// Translate a TypeScript declaration bundle into the Kotlin/JS target model.
#[derive(Debug, Parser)]
#[command(name = "tsbind", version, about)]
struct CliArgs {
    /// JSON `SourceBundleDeclaration` to translate.
    input: PathBuf,

    /// Where to write the JSON target model; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file; `tsbind.json` in the working directory when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reuse a serialized library Node Model.
    #[arg(long)]
    library_cache: Option<PathBuf>,

    /// Write the library Node Model for later runs.
    #[arg(long)]
    emit_library_cache: Option<PathBuf>,

    /// Exit non-zero when any diagnostic was raised.
    #[arg(long)]
    strict: bool,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
}

impl CliArgs {
    fn overrides(&self) -> TsbindConfig {
        TsbindConfig {
            library_cache: self.library_cache.clone(),
            emit_library_cache: self.emit_library_cache.clone(),
            pretty: self.pretty.then_some(true),
            strict: self.strict.then_some(true),
        }
    }
}

fn main() -> Result<()> {
    // TSBIND_LOG / RUST_LOG, see src/tracing_config.rs.
    tsbind::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let file_config = match args.config.clone().or_else(|| config::find_config(&cwd)) {
        Some(path) => config::load_config(&path)?,
        None => TsbindConfig::default(),
    };
    let options = file_config.merge(args.overrides()).resolve();

    let bundle = driver::read_bundle(&args.input)?;
    let translation = driver::translate(bundle, &options)?;
    driver::write_model(&translation.model, args.output.as_deref(), options.pretty)?;

    let reporter = Reporter::new(std::io::stderr().is_terminal());
    eprintln!("{}", reporter.render(&translation.diagnostics));

    std::process::exit(driver::exit_code(&translation.diagnostics, options.strict));
}
