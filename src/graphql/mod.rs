//! GraphQL schema and resolvers for roster.
//!
//! Exposes users and companies over GraphQL. Each root field maps to one
//! store operation; the relational fields (`User.company`, `Company.users`)
//! are resolved on demand with one lookup per parent record.
//!
//! ## Usage
//!
//! ```bash
//! # Start the GraphQL server
//! roster serve --port 4000
//!
//! # Execute a query from CLI
//! roster query '{ companies { _id name users { firstName } } }'
//!
//! # Execute a mutation from CLI
//! roster mutate 'createCompany(name: "Acme", slogan: "Go") { _id }'
//! ```
//!
//! ## Schema
//!
//! - **Queries**: `user`, `users`, `company`, `companies`
//! - **Mutations**: `createUser`, `updateUser`, `deleteUser`,
//!   `createCompany`, `updateCompany`, `deleteCompany`

mod context;
mod schema;
mod server;
mod types;

pub use context::{RequestContext, RequestOrigin};
pub use schema::{MutationRoot, QueryRoot, RosterSchema, build_schema};
pub use server::{GRAPHQL_PATH, router, run_server};
pub use types::*;
