use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use version_checker::config::CheckerConfig;
use version_checker::version::session::CheckSession;
use version_checker::version::source::FsFileSource;

#[derive(Parser)]
#[command(name = "version-checker")]
#[command(version, about = "Keeps a version number duplicated across project files in sync")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check the configured files once and print the result
    Check(CheckArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Project root the configured files are relative to (defaults to the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/.version-checker.json, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(version_checker::lsp::server::run_server())?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Check(args)) => run_check(args),
    }
}

fn run_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    init_stderr_logging(args.verbose);

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    let config = CheckerConfig::discover(&root, args.config.as_deref())?;

    let outcome = CheckSession::new(config, Some(root)).run(&FsFileSource);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);
    } else {
        println!("{}", outcome.summary());
        println!();
        println!("{}", outcome.detail());
    }

    Ok(if outcome.is_consistent() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_stderr_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("version_checker=debug")
    } else {
        EnvFilter::new("version_checker=warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
        .with(filter)
        .init();
}
