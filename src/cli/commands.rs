use crate::config::StorageBackend;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roster")]
#[command(
    author,
    version,
    about = "A GraphQL API for users and the companies they belong to"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .roster.yml by default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a roster project in the current directory
    Init {
        /// Storage backend for the project
        #[arg(long, value_enum, default_value_t = StorageBackend::File)]
        backend: StorageBackend,

        /// Data directory, relative to the project root
        #[arg(long)]
        path: Option<String>,

        /// Port the server listens on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Start the GraphQL server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long, env = "ROSTER_PORT")]
        port: Option<u16>,

        /// Address to bind (overrides config)
        #[arg(long, env = "ROSTER_HOST")]
        host: Option<IpAddr>,
    },

    /// Execute a GraphQL query against the configured store
    #[command(visible_alias = "q")]
    Query {
        /// GraphQL query string
        query: String,

        /// Variables as JSON
        #[arg(long)]
        variables: Option<String>,
    },

    /// Execute a GraphQL mutation against the configured store
    #[command(visible_alias = "m")]
    Mutate {
        /// Mutation body (without 'mutation' keyword)
        mutation: String,

        /// Variables as JSON
        #[arg(long)]
        variables: Option<String>,
    },

    /// Print the GraphQL schema (SDL)
    Schema,
}
