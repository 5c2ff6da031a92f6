//! prewarm CLI: warm a shared compile cache at process startup.
//!
//! Provides `prewarm init` to write a starter `prewarm.toml`, `prewarm list`
//! to print the resolved target list, `prewarm check` for an existence-only
//! dry run, and `prewarm run` to precompile every target.

#![warn(missing_docs)]

mod check;
mod command;
mod init;
mod list;
mod pipeline;
mod run;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// prewarm: precompile a configured file list into a shared cache.
#[derive(Parser, Debug)]
#[command(name = "prewarm", version, about = "Startup precompile sweeps")]
pub struct Cli {
    /// Only print errors (failed compiles, bad configuration).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also log every compiled file and the resolved configuration.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// When to color diagnostics on stderr.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `prewarm.toml` file, or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// `prewarm` subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter `prewarm.toml`.
    Init {
        /// Directory to create the config in (default: current directory).
        dir: Option<String>,

        /// Base directory written into the config.
        #[arg(short, long, default_value = ".")]
        base_dir: String,
    },
    /// Print the resolved target list.
    List(ListArgs),
    /// Report which targets exist, without compiling anything.
    Check,
    /// Precompile every target.
    Run(RunArgs),
}

/// Arguments for the `prewarm list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print absolute paths instead of base-relative targets.
    #[arg(short, long)]
    pub absolute: bool,
}

/// Arguments for the `prewarm run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Attempt targets in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Exit with status 1 if any target fails.
    #[arg(long)]
    pub strict: bool,

    /// Output format for the sweep report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Values for `--color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always emit ANSI codes.
    Always,
    /// Plain text.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable diagnostics on stderr.
    Text,
    /// The full sweep report as JSON on stdout.
    Json,
}

/// Flags shared by every subcommand, resolved once in `main`.
pub struct GlobalArgs {
    /// `--quiet`.
    pub quiet: bool,
    /// `--verbose`.
    pub verbose: bool,
    /// `--color`, with `auto` already decided.
    pub color: bool,
    /// Optional path to a config file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_logging(&global);
    install_panic_hook();

    let result = match cli.command {
        Command::Init { dir, base_dir } => init::run(dir, &base_dir, &global),
        Command::List(ref args) => list::run(args, &global),
        Command::Check => check::run(&global),
        Command::Run(ref args) => run::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the `env_logger` backend. `RUST_LOG` overrides the flag-derived level.
fn init_logging(global: &GlobalArgs) {
    let level = if global.quiet {
        log::LevelFilter::Error
    } else if global.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .write_style(if global.color {
            env_logger::WriteStyle::Always
        } else {
            env_logger::WriteStyle::Never
        })
        .try_init();
}

/// Sends panic reports through `log` instead of straight to stderr.
///
/// Compiler panics are caught by the sweep and reported as compile errors, so
/// the hook's own line is only useful with `--verbose`.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        log::debug!(target: "prewarm::panic", "{info}");
    }));
}
