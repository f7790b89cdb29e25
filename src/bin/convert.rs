//! Schema Conversion CLI
//!
//! Reads a dump of the CMS content-type and component registries and writes
//! `types/contentTypes.d.ts` under the project root.
//!
//! Usage:
//!   schemas-to-ts --input schemas.json --root ./my-cms
//!   schemas-to-ts --input schemas.json --check

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use schemas_to_ts::output::{diff_against_existing, format_or_passthrough, output_path};
use schemas_to_ts::{
    convert, write_declarations, ConvertError, Formatter, PluginConfig, PrettierFormatter, SchemaInput,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemas-to-ts")]
#[command(about = "Generate TypeScript declarations from CMS schemas")]
#[command(version)]
struct Cli {
    /// JSON dump with `contentTypes` and `components` registries
    #[arg(short, long)]
    input: PathBuf,

    /// Project root; the module is written to <root>/types/contentTypes.d.ts
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Config file layered over the default locations
    #[arg(short, long)]
    config: Option<String>,

    /// Runtime mode checked against `accepted_runtime_modes`
    #[arg(short, long, env = "NODE_ENV")]
    mode: Option<String>,

    /// Never run the external formatter
    #[arg(long)]
    no_format: bool,

    /// Compare with the existing file instead of writing; exit 1 on drift
    #[arg(long)]
    check: bool,

    /// Print the module instead of writing it
    #[arg(long, conflicts_with = "check")]
    stdout: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match PluginConfig::load_from(cli.config.as_deref()).map_err(ConvertError::from) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if config.verbose_logging { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli, config: PluginConfig) -> anyhow::Result<i32> {
    let mode = cli.mode.clone().unwrap_or_default();
    if !config.accepts_mode(&mode) {
        let reason = ConvertError::ModeNotAccepted {
            mode,
            accepted: config.accepted_runtime_modes.clone(),
        };
        info!("{}. Skipping conversion of schemas to TypeScript.", reason);
        return Ok(0);
    }

    let input = SchemaInput::from_path(&cli.input)
        .with_context(|| format!("reading schemas from {}", cli.input.display()))?;

    let generated = convert(&input, &config);

    let formatter = if config.use_external_formatter_if_available && !cli.no_format {
        PrettierFormatter::discover(&cli.root)
    } else {
        None
    };
    let code = format_or_passthrough(formatter.as_ref().map(|f| f as &dyn Formatter), generated.code);

    if cli.stdout {
        print!("{}", code);
        return Ok(0);
    }

    let path = output_path(&cli.root);

    if cli.check {
        return match diff_against_existing(&path, &code)? {
            None => {
                eprintln!("✅ {} is up to date", path.display());
                Ok(0)
            }
            Some(diff) => {
                print!("{}", diff);
                eprintln!("⚠️  {} is out of date", path.display());
                Ok(1)
            }
        };
    }

    let written = write_declarations(&cli.root, &code)
        .with_context(|| format!("writing {}", path.display()))?;

    println!(
        "📦 {} content types, {} components -> {}",
        generated.content_type_count,
        generated.component_count,
        written.display()
    );
    Ok(0)
}
