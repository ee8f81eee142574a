use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use monaco_theme::config::Settings;
use monaco_theme::convert::{self, convert_dir, convert_file, convert_source};
use monaco_theme::Result;

#[derive(Debug, Parser)]
#[command(
    name = "monaco-theme",
    about = "Convert VS Code color themes into Monaco editor theme definitions",
    version
)]
struct Cli {
    /// Log conversion details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a single theme file.
    Convert(ConvertArgs),

    /// Convert every theme file in a directory.
    Batch(BatchArgs),

    /// Print the settings file location and current settings.
    Config,
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// VS Code theme JSON file
    input: PathBuf,

    /// Output file (default: <stem>.monaco.json)
    #[arg(short, long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Theme name used in diagnostics
    #[arg(long)]
    name: Option<String>,

    /// Print the converted theme instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Write single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Directory of theme files (default: configured theme_dir, else ".")
    dir: Option<PathBuf>,

    /// Directory to write converted themes to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write single-line JSON
    #[arg(long)]
    compact: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_convert(args: ConvertArgs, mut settings: Settings) -> Result<()> {
    if args.compact {
        settings.pretty = false;
    }

    if args.stdout {
        let (_, target) = convert_source(&args.input, args.name.as_deref())?;
        println!("{}", convert::to_json(&target, settings.pretty)?);
        return Ok(());
    }

    let written = convert_file(&args.input, args.output.as_deref(), &settings, args.name.as_deref())?;
    println!("{}", written.display());
    Ok(())
}

fn run_batch(args: BatchArgs, mut settings: Settings) -> Result<bool> {
    if args.compact {
        settings.pretty = false;
    }

    let dir = args.dir.unwrap_or_else(|| settings.theme_dir());
    let report = convert_dir(&dir, args.output_dir.as_deref(), &settings)?;

    for path in &report.converted {
        println!("{}", path.display());
    }
    for (path, err) in &report.failed {
        eprintln!("Failed: {}: {}", path.display(), err);
    }
    println!(
        "{} converted, {} failed",
        report.converted.len(),
        report.failed.len()
    );
    Ok(report.failed.is_empty())
}

fn show_config() -> Result<()> {
    match Settings::config_path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# (no home directory)"),
    }
    let settings = Settings::load_with_error()?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load();
    let result = match cli.command {
        Commands::Convert(args) => run_convert(args, settings).map(|_| true),
        Commands::Batch(args) => run_batch(args, settings),
        Commands::Config => show_config().map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
