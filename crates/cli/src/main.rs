//! protoc-gen-tsd
//!
//! protoc plugin binary: reads a `CodeGeneratorRequest` from stdin and
//! writes a `CodeGeneratorResponse` with one `.d.ts` file per requested
//! `.proto` file to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use protoc_gen_tsd::{PluginDriver, TemplateRenderer};
use std::io::{self, Read, Write};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "protoc-gen-tsd")]
#[command(
    version,
    about = "protoc plugin that generates TypeScript declaration files",
    after_help = "EXAMPLES:\n  \
        # Generate .d.ts files next to the compiled protos\n  \
        protoc --plugin=protoc-gen-tsd=./protoc-gen-tsd \\\n    \
        --tsd_out=./generated \\\n    \
        shop/order.proto"
)]
struct Cli {}

fn main() -> ExitCode {
    init_tracing();
    Cli::parse();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "protoc-gen-tsd error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; stdout carries the response
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn run() -> Result<()> {
    let mut input = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("failed to read CodeGeneratorRequest from stdin")?;

    let renderer = TemplateRenderer::new().context("failed to load templates")?;
    let mut driver = PluginDriver::new(renderer);
    let output = driver
        .run(&input)
        .context("failed to generate declaration files")?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&output)
        .context("failed to write CodeGeneratorResponse to stdout")?;
    stdout.flush().context("failed to flush stdout")?;

    Ok(())
}
