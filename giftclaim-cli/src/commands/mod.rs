//! CLI command implementations.

pub mod audit;
pub mod claim;
pub mod codes;
pub mod players;

use anyhow::Result;
use serde::Serialize;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Prints a value in the selected format.
pub(crate) fn emit<T: Serialize + ?Sized>(
    cli: &Cli,
    value: &T,
    text: impl FnOnce(&TextFormatter) -> String,
) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", text(&formatter));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(value)?);
        }
    }
    Ok(())
}
