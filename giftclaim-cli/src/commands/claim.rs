//! Claim commands - batch claims, single-player claims and direct redemption.

use anyhow::Result;
use clap::Args;
use giftclaim_core::ClaimReport;
use giftclaim_engine::ClaimRequest;
use tracing::info;

use super::emit;
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the claim command.
#[derive(Args, Default)]
pub struct ClaimArgs {
    /// Player to claim for (repeatable). Defaults to every registered player.
    #[arg(long = "player", short = 'p', value_name = "ID")]
    pub players: Vec<String>,

    /// Code to claim (repeatable). Defaults to the listed active codes.
    #[arg(long = "code", short = 'c', value_name = "CODE")]
    pub codes: Vec<String>,

    /// Re-attempt pairs that are already recorded as claimed.
    #[arg(long)]
    pub force: bool,
}

impl ClaimArgs {
    fn to_request(&self) -> ClaimRequest {
        ClaimRequest {
            players: self.players.clone(),
            codes: (!self.codes.is_empty()).then(|| self.codes.clone()),
            force: self.force,
        }
    }
}

/// Arguments for the claim-self command.
#[derive(Args)]
pub struct ClaimSelfArgs {
    /// Registered player id.
    pub id: String,
}

/// Arguments for the redeem command.
#[derive(Args)]
pub struct RedeemArgs {
    /// Gift code to redeem.
    pub code: String,

    /// Player to redeem for (repeatable).
    #[arg(long = "player", short = 'p', value_name = "ID", required = true)]
    pub players: Vec<String>,
}

/// Runs the claim command.
pub async fn run_claim(args: &ClaimArgs, ctx: &AppContext, cli: &Cli) -> Result<()> {
    info!(
        players = args.players.len(),
        codes = args.codes.len(),
        force = args.force,
        "Starting claim run"
    );
    let report = ctx
        .orchestrator
        .run_claim_batch(args.to_request(), &AppContext::meta())
        .await?;
    print_report(&report, cli)
}

/// Runs the claim-self command.
pub async fn run_claim_self(args: &ClaimSelfArgs, ctx: &AppContext, cli: &Cli) -> Result<()> {
    let report = ctx
        .orchestrator
        .claim_for_player(&args.id, &AppContext::meta())
        .await?;
    print_report(&report, cli)
}

/// Runs the redeem command.
pub async fn run_redeem(args: &RedeemArgs, ctx: &AppContext, cli: &Cli) -> Result<()> {
    let report = ctx
        .orchestrator
        .redeem_code(&args.code, &args.players, &AppContext::meta())
        .await?;
    print_report(&report, cli)
}

fn print_report(report: &ClaimReport, cli: &Cli) -> Result<()> {
    emit(cli, report, |f| f.format_report(report))
}
