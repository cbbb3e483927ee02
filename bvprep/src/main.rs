//! bvprep CLI
//!
//! Reads a module serialized as JSON by the Python front end, runs the
//! preprocessing pass, and prints the result.

use std::error::Error;
use std::path::{Path, PathBuf};

use bvprep::error::report_error;
use bvprep::{Module, PassConfig, PassOutput, Preprocessor};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "bvprep", version, about = "Verification preprocessing for Python syntax trees")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lower range loops, annotate widths and print the rewritten module
    Lower {
        /// JSON syntax tree to transform
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[command(flatten)]
        pass: PassArgs,
    },
    /// Print the inferred parameter width of every profiled function and the
    /// module constants that fed it
    Widths {
        /// JSON syntax tree to analyze
        file: PathBuf,
        #[command(flatten)]
        pass: PassArgs,
    },
}

#[derive(Args)]
struct PassArgs {
    /// TOML file overriding the pass configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Largest integer width the backend can encode
    #[arg(long)]
    max_width: Option<u64>,
    /// Program source the tree was parsed from, for rendering diagnostics
    #[arg(long)]
    source: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Lower { file, format, pass } => lower_file(&file, format, &pass),
        Command::Widths { file, pass } => print_widths(&file, &pass),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install a subscriber only when `RUST_LOG` asks for one
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn load_config(pass: &PassArgs) -> Result<PassConfig, Box<dyn Error>> {
    let config = match &pass.config {
        Some(path) => PassConfig::load(path)?,
        None => PassConfig::default(),
    };
    Ok(match pass.max_width {
        Some(ceiling) => config.max_width(Some(ceiling)),
        None => config,
    })
}

fn run_pass(path: &Path, pass: &PassArgs) -> Result<PassOutput, Box<dyn Error>> {
    let config = load_config(pass)?;
    let module: Module = serde_json::from_str(&std::fs::read_to_string(path)?)?;

    match Preprocessor::new(config).run(module) {
        Ok(out) => Ok(out),
        Err(e) => {
            if let Some(source_path) = &pass.source {
                let source = std::fs::read_to_string(source_path)?;
                report_error(&source_path.display().to_string(), &source, &e)?;
            }
            Err(e.into())
        }
    }
}

fn lower_file(path: &Path, format: Format, pass: &PassArgs) -> Result<(), Box<dyn Error>> {
    let out = run_pass(path, pass)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&out.module)?),
        Format::Text => print!("{}", out.module),
    }
    Ok(())
}

fn print_widths(path: &Path, pass: &PassArgs) -> Result<(), Box<dyn Error>> {
    let out = run_pass(path, pass)?;
    for (function, entry) in out.profile.sorted() {
        println!("{function}: {} bits (widest argument at {})", entry.width, entry.span);
    }
    println!("other functions: {} bits", load_config(pass)?.default_width);

    let mut constants: Vec<_> = out.constants.iter().collect();
    if !constants.is_empty() {
        constants.sort_by(|a, b| a.0.cmp(b.0));
        println!();
        println!("module constants:");
        for (name, value) in constants {
            println!("  {name} = {value} ({} bits)", value.bits());
        }
    }
    Ok(())
}
