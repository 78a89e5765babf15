//! Players command - manage the registered roster.

use anyhow::Result;
use clap::{Args, Subcommand};
use giftclaim_core::PlayerId;
use tracing::info;

use super::emit;
use crate::Cli;
use crate::context::AppContext;

/// Arguments for the players command.
#[derive(Args)]
pub struct PlayersArgs {
    #[command(subcommand)]
    pub action: PlayersAction,
}

/// Players subcommands.
#[derive(Subcommand)]
pub enum PlayersAction {
    /// List registered players.
    List,

    /// Verify a player with the vendor and register them.
    Add {
        /// Player id (8-10 digits).
        id: String,
    },

    /// Unregister a player. Claim history is kept.
    Remove {
        /// Player id.
        id: String,
    },

    /// Show claim statistics.
    Stats {
        /// Player ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Runs the players command.
pub async fn run(args: &PlayersArgs, ctx: &AppContext, cli: &Cli) -> Result<()> {
    match &args.action {
        PlayersAction::List => list(ctx, cli).await,
        PlayersAction::Add { id } => add(id, ctx, cli).await,
        PlayersAction::Remove { id } => remove(id, ctx, cli).await,
        PlayersAction::Stats { ids } => stats(ids, ctx, cli).await,
    }
}

async fn list(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let players = ctx.orchestrator.registry().list().await?;
    emit(cli, &players, |f| f.format_players(&players))
}

async fn add(id: &str, ctx: &AppContext, cli: &Cli) -> Result<()> {
    info!(player = id, "Registering player");
    let player = ctx.enrollment.add_player(id, &AppContext::meta()).await?;
    emit(cli, &player, |f| f.format_player_added(&player))
}

async fn remove(id: &str, ctx: &AppContext, cli: &Cli) -> Result<()> {
    ctx.enrollment.remove_player(id, &AppContext::meta()).await?;
    let removed = serde_json::json!({ "playerId": id.trim(), "removed": true });
    emit(cli, &removed, |_| format!("Removed player {}", id.trim()))
}

async fn stats(ids: &[String], ctx: &AppContext, cli: &Cli) -> Result<()> {
    let registry = ctx.orchestrator.registry();
    let ledger = ctx.orchestrator.ledger();

    let mut all = Vec::with_capacity(ids.len());
    for id in ids {
        let id = PlayerId::parse(id)?;
        all.push(registry.stats(&id, ledger).await?);
    }

    emit(cli, &all, |f| {
        all.iter()
            .map(|s| f.format_stats(s))
            .collect::<Vec<_>>()
            .join("\n\n")
    })
}
