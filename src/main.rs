use anyhow::Result;
use clap::Parser;

use roster::cli::handlers::{
    CommandContext, handle_init, handle_mutate, handle_query, handle_schema, handle_serve,
};
use roster::cli::{Cli, Commands};
use roster::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.clone());

    let load = || CommandContext::load(cli.config.as_deref());

    match cli.command {
        Commands::Init {
            backend,
            path,
            port,
        } => handle_init(backend, path, port),
        Commands::Serve { port, host } => handle_serve(load()?, port, host),
        Commands::Query { query, variables } => handle_query(load()?, query, variables),
        Commands::Mutate {
            mutation,
            variables,
        } => handle_mutate(load()?, mutation, variables),
        Commands::Schema => handle_schema(),
    }
}
