mod commands;
mod core;
mod logging;
mod output;
mod release;
mod utils;

use clap::{Parser, Subcommand};
use crate::core::error::{TrackerError, print_error};
use std::path::PathBuf;

/// Track upstream codec repositories and derive release identifiers
#[derive(Parser)]
#[command(name = "upstream-tracker")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Config file (default: upstream.toml, .upstream.toml or .github/upstream.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Show debug diagnostics on stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Only show errors on stderr
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Check tracked repositories for new commits and update the snapshot
  Check {
    /// Snapshot file (overrides config)
    #[arg(long)]
    state: Option<PathBuf>,
    /// Output a JSON report instead of the summary line
    #[arg(long)]
    json: bool,
  },

  /// Derive tag name, zip name and release notes from the snapshot
  ReleaseInfo {
    /// Snapshot file (overrides config)
    #[arg(long)]
    state: Option<PathBuf>,
    /// Release notes output file (overrides config)
    #[arg(long)]
    notes: Option<PathBuf>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show the recorded state of every tracked repository
  Status {
    /// Snapshot file (overrides config)
    #[arg(long)]
    state: Option<PathBuf>,
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(e) = logging::init(cli.quiet, cli.verbose) {
    eprintln!("Warning: Failed to initialize logging: {}", e);
  }

  let root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  let ctx = match crate::core::context::TrackerContext::build(&root, cli.config.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Check { state, json } => commands::run_check(&ctx, state, json),
    Commands::ReleaseInfo { state, notes, json } => commands::run_release_info(&ctx, state, notes, json),
    Commands::Status { state, json } => commands::run_status(&ctx, state, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: TrackerError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
