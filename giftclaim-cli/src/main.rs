// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Giftclaim CLI - gift code discovery and claim automation from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Show the currently active codes
//! giftclaim codes
//!
//! # Include expired codes and who claimed what
//! giftclaim codes --expired --claims
//!
//! # Register a player (verified with the vendor first)
//! giftclaim players add 12345678
//!
//! # Claim every active code for every registered player
//! giftclaim claim
//!
//! # Redeem one code for specific players
//! giftclaim redeem WINTER2025 --player 12345678 --player 87654321
//!
//! # JSON output
//! giftclaim --format json --pretty audit --limit 20
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use giftclaim_core::CoreError;
use giftclaim_engine::EngineError;
use giftclaim_store::{LogLevel, StoreError};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use commands::{audit, claim, codes, players};

// ============================================================================
// CLI Definition
// ============================================================================

/// Giftclaim CLI - gift code claim automation.
#[derive(Parser)]
#[command(name = "giftclaim")]
#[command(about = "Gift code discovery and claim automation")]
#[command(long_about = r#"
Giftclaim watches the public gift code listing, keeps a roster of players,
and redeems each active code once per player.

Examples:
  giftclaim codes                         # Active codes
  giftclaim players add 12345678          # Register a player
  giftclaim claim                         # Claim for every player
  giftclaim claim --player 12345678       # Claim for one player
  giftclaim redeem CODE --player ID       # Redeem one code directly
  giftclaim --format json audit           # Audit trail as JSON
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file (defaults to $GIFTCLAIM_CONFIG or the platform config dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and show the listed gift codes.
    #[command(visible_alias = "c")]
    Codes(codes::CodesArgs),

    /// Manage registered players.
    #[command(visible_alias = "p")]
    Players(players::PlayersArgs),

    /// Claim active codes for registered players.
    Claim(claim::ClaimArgs),

    /// Claim every active code for one registered player.
    ClaimSelf(claim::ClaimSelfArgs),

    /// Redeem one code for a list of players.
    Redeem(claim::RedeemArgs),

    /// Show recent audit events.
    #[command(visible_alias = "a")]
    Audit(audit::AuditArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Invalid input.
    Validation = 2,
    /// Player not found or not known to the vendor.
    NotFound = 3,
    /// The listing could not be fetched.
    Extraction = 4,
}

impl ExitCode {
    /// Maps a command failure to an exit code.
    fn for_error(err: &anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<EngineError>() {
            if matches!(e, EngineError::Extraction(_)) {
                Self::Extraction
            } else if e.is_validation() {
                Self::Validation
            } else if e.is_not_found() {
                Self::NotFound
            } else {
                Self::Error
            }
        } else if let Some(e) = err.downcast_ref::<StoreError>() {
            match e {
                StoreError::PlayerNotFound(_) => Self::NotFound,
                StoreError::PlayerExists(_) | StoreError::EmptyUpdate | StoreError::Config(_) => {
                    Self::Validation
                }
                _ => Self::Error,
            }
        } else if let Some(e) = err.downcast_ref::<CoreError>() {
            match e {
                CoreError::InvalidPlayerId(_) | CoreError::InvalidCode(_) => Self::Validation,
                _ => Self::Error,
            }
        } else {
            Self::Error
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Installs the stderr subscriber.
///
/// Returns a handle for swapping in the configured level once settings are
/// loaded, or `None` when the level is fixed by flags or `RUST_LOG`.
fn setup_logging(verbose: bool, quiet: bool) -> Option<FilterHandle> {
    if quiet {
        return None; // No logging in quiet mode
    }

    let from_env = std::env::var_os("RUST_LOG").is_some();
    let filter = if verbose {
        EnvFilter::new("giftclaim=debug,info")
    } else if from_env {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("giftclaim=warn")
    };

    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    (!verbose && !from_env).then_some(handle)
}

/// Applies the settings log level.
fn apply_log_level(handle: &FilterHandle, level: LogLevel) {
    if let Err(e) = handle.reload(EnvFilter::new(format!("giftclaim={level}"))) {
        debug!(error = %e, "Could not apply configured log level");
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_handle = setup_logging(cli.verbose, cli.quiet);

    let result = run(&cli, log_handle.as_ref()).await;

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

async fn run(cli: &Cli, log_handle: Option<&FilterHandle>) -> Result<()> {
    let ctx = context::AppContext::load(cli.config.as_deref()).await?;
    if let Some(handle) = log_handle {
        apply_log_level(handle, ctx.settings.log_level);
    }

    match &cli.command {
        Commands::Codes(args) => codes::run(args, &ctx, cli).await,
        Commands::Players(args) => players::run(args, &ctx, cli).await,
        Commands::Claim(args) => claim::run_claim(args, &ctx, cli).await,
        Commands::ClaimSelf(args) => claim::run_claim_self(args, &ctx, cli).await,
        Commands::Redeem(args) => claim::run_redeem(args, &ctx, cli).await,
        Commands::Audit(args) => audit::run(args, &ctx, cli).await,
    }
}
