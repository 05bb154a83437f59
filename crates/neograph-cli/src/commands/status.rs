//! Graph status command.

use anyhow::Result;
use colored::Colorize;

use crate::config::Settings;

pub async fn execute(settings: &Settings) -> Result<()> {
    let client = super::connect(settings).await?;
    let counts = client.get_counts().await?;

    println!("{} {}", "Graph Status".bold(), settings.graph.uri.dimmed());
    println!("{}", "─".repeat(40));
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
    for (label, count) in &counts.labels {
        println!("    {:<12} {}", label, count);
    }
    println!("{}", "─".repeat(40));

    Ok(())
}
