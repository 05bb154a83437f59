//! CLI command definitions and handlers.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use neograph_graph::GraphClient;

use crate::config::{GraphOverrides, Settings};

pub mod hierarchy;
pub mod load;
pub mod schema;
pub mod status;

/// How long to wait for Neo4j to answer the connection ping.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Neograph - load coded clinical visit tables into a property graph
#[derive(Parser)]
#[command(name = "neograph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ./neograph.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Neo4j bolt URI
    #[arg(long, global = true, env = "NEO4J_URI")]
    pub uri: Option<String>,

    /// Neo4j user
    #[arg(long, global = true, env = "NEO4J_USER")]
    pub user: Option<String>,

    /// Neo4j password
    #[arg(long, global = true, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Neo4j database name
    #[arg(long, global = true, env = "NEO4J_DATABASE")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a visit table into the graph
    Load(load::LoadArgs),

    /// Create uniqueness constraints for every node label
    Schema,

    /// Show node and relationship counts
    Status,

    /// Print the prefix hierarchy derived for diagnosis codes
    Hierarchy {
        /// Diagnosis codes, dots allowed (e.g. 250.01)
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut settings = Settings::load(self.config.as_deref())?;
        settings.apply(GraphOverrides {
            uri: self.uri,
            user: self.user,
            password: self.password,
            database: self.database,
        });

        match self.command {
            Commands::Load(args) => load::execute(args, &settings).await,
            Commands::Schema => schema::execute(&settings).await,
            Commands::Status => status::execute(&settings).await,
            Commands::Hierarchy { codes } => {
                hierarchy::execute(&codes);
                Ok(())
            }
        }
    }
}

/// Connect to Neo4j, failing fast when the server does not answer.
pub async fn connect(settings: &Settings) -> Result<GraphClient> {
    tokio::time::timeout(CONNECT_TIMEOUT, GraphClient::connect(&settings.graph))
        .await
        .with_context(|| format!("Timed out connecting to Neo4j at {}", settings.graph.uri))?
        .with_context(|| format!("Could not connect to Neo4j at {}", settings.graph.uri))
}
