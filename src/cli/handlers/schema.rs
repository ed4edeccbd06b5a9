use anyhow::Result;

use crate::graphql::build_schema;
use crate::storage::{Database, IdGenerator};

/// Print the SDL; the schema does not depend on the configured store.
pub fn handle_schema() -> Result<()> {
    let schema = build_schema(Database::in_memory(IdGenerator::default()));
    println!("{}", schema.sdl());
    Ok(())
}
