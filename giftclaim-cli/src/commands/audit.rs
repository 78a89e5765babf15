//! Audit command - show recent audit events.

use anyhow::Result;
use clap::Args;

use super::emit;
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the audit command.
#[derive(Args)]
pub struct AuditArgs {
    /// Number of events to show, newest first.
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Show every retained event.
    #[arg(long, conflicts_with = "limit")]
    pub all: bool,
}

/// Runs the audit command.
pub async fn run(args: &AuditArgs, ctx: &AppContext, cli: &Cli) -> Result<()> {
    let limit = (!args.all).then_some(args.limit);
    let events = ctx.orchestrator.audit().recent(limit).await?;
    emit(cli, &events, |f| f.format_audit(&events))
}
