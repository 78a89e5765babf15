//! Codes command - fetch and display the listed gift codes.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the codes command.
#[derive(Args, Default)]
pub struct CodesArgs {
    /// Include expired codes.
    #[arg(long)]
    pub expired: bool,

    /// Show which players claimed each code.
    #[arg(long)]
    pub claims: bool,
}

/// Runs the codes command.
pub async fn run(args: &CodesArgs, ctx: &AppContext, cli: &Cli) -> Result<()> {
    info!(url = %ctx.settings.listing_url, "Fetching gift codes");

    let outcome = ctx.orchestrator.discover().await?;
    let now = Utc::now();

    for attempt in &outcome.attempts {
        debug!(
            strategy = %attempt.strategy_id,
            found = attempt.found,
            duration_ms = attempt.duration.as_millis(),
            "Extraction attempt"
        );
    }

    if args.claims {
        let entries = ctx
            .orchestrator
            .ledger()
            .codes_with_claims(&outcome.codes)
            .await?;
        let entries: Vec<_> = if args.expired {
            entries
        } else {
            entries.into_iter().filter(|e| e.code.is_active()).collect()
        };

        match cli.format {
            OutputFormat::Text => {
                let formatter = TextFormatter::new(!cli.no_color);
                println!("{}", formatter.format_code_claims(&entries, now));
            }
            OutputFormat::Json => {
                let formatter = JsonFormatter::new(cli.pretty);
                println!("{}", formatter.format_code_claims(&entries, now)?);
            }
        }
        return Ok(());
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_codes(&outcome.codes, args.expired, now));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_codes(&outcome, args.expired, now)?);
        }
    }

    Ok(())
}
