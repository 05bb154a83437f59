//! Schema command.

use anyhow::Result;
use colored::Colorize;

use crate::config::Settings;

pub async fn execute(settings: &Settings) -> Result<()> {
    let client = super::connect(settings).await?;
    let count = neograph_graph::schema::initialize_schema(&client).await?;
    println!("{} {} constraints ensured", "✓".green(), count);
    Ok(())
}
