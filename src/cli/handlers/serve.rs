use std::net::IpAddr;

use anyhow::Result;
use colored::Colorize;

use crate::graphql::{GRAPHQL_PATH, build_schema, run_server};

use super::CommandContext;

pub fn handle_serve(ctx: CommandContext, port: Option<u16>, host: Option<IpAddr>) -> Result<()> {
    let mut server = ctx.config.server.clone();
    if let Some(p) = port {
        server.port = p;
    }
    if let Some(h) = host {
        server.host = h;
    }
    let addr = server.addr();

    let schema = build_schema(ctx.database()?);

    println!(
        "{} GraphQL server on http://{}{}",
        "Starting".green(),
        addr,
        GRAPHQL_PATH
    );
    println!("GraphiQL: http://{}{}", addr, GRAPHQL_PATH);

    tokio::runtime::Runtime::new()?.block_on(run_server(schema, addr))?;
    Ok(())
}
