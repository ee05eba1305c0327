//! dashgen — dev-dashboard manifest generator.
//!
//! # Usage
//!
//! ```text
//! dashgen [--config <file>] [--root <dir>] [--output <file>] [--template-dir <dir>]
//! dashgen --verify            # or: CODEGEN_VERIFY=1 dashgen
//! ```
//!
//! Without `--verify` the manifest is (re)written. In verify mode nothing is
//! written and the process fails if the committed manifest is stale.

mod commands;

use std::process::ExitCode;

use clap::Parser;

use commands::generate::GenerateArgs;

/// Presence of this variable (any value) selects verify mode.
pub const VERIFY_ENV: &str = "CODEGEN_VERIFY";

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "dashgen",
    version,
    about = "Generate or verify the dev-dashboard manifest",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    args: GenerateArgs,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let verify_env = std::env::var_os(VERIFY_ENV).is_some();
    match cli.args.run(verify_env) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
