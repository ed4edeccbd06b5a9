mod init;
mod mutate;
mod query;
mod schema;
mod serve;

pub use init::handle_init;
pub use mutate::handle_mutate;
pub use query::handle_query;
pub use schema::handle_schema;
pub use serve::handle_serve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::RosterConfig;
use crate::storage::Database;

/// Common context passed to command handlers that need a configured project
pub struct CommandContext {
    pub config: RosterConfig,
    pub root: PathBuf,
}

impl CommandContext {
    pub fn new(config: RosterConfig, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// Load the explicit config file, or search upward from the current directory.
    ///
    /// Without any config file the defaults apply.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let (config, root) = match config_path {
            Some(path) => RosterConfig::load_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                let cwd = std::env::current_dir()?;
                RosterConfig::load_or_default(&cwd)
                    .context("Failed to load roster configuration")?
            }
        };
        Ok(Self::new(config, root))
    }

    pub fn database(&self) -> Result<Database> {
        Database::open(&self.config, &self.root).context("Failed to open storage")
    }
}

/// Parse `--variables` JSON into GraphQL variables.
pub(crate) fn parse_variables(variables: Option<String>) -> Result<async_graphql::Variables> {
    match variables {
        Some(v) => {
            let value: serde_json::Value =
                serde_json::from_str(&v).context("Variables must be valid JSON")?;
            Ok(async_graphql::Variables::from_json(value))
        }
        None => Ok(async_graphql::Variables::default()),
    }
}

/// Execute a request against the project's store and print the JSON response.
///
/// Fails after printing when the response carries errors.
pub(crate) fn execute_and_print(
    ctx: &CommandContext,
    query: String,
    variables: async_graphql::Variables,
) -> Result<()> {
    let schema = crate::graphql::build_schema(ctx.database()?);
    let request = async_graphql::Request::new(query)
        .variables(variables)
        .data(crate::graphql::RequestContext::cli());

    let response = tokio::runtime::Runtime::new()?.block_on(schema.execute(request));
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.is_err() {
        anyhow::bail!("GraphQL request failed with {} error(s)", response.errors.len());
    }
    Ok(())
}
