//! # Roster - a GraphQL API for users and companies
//!
//! Roster exposes CRUD operations over two related records, `User` and
//! `Company`, through a GraphQL schema backed by a document store. A user
//! belongs to a company; a company has many users.
//!
//! ## Features
//!
//! - **GraphQL API**: Query and mutate users and companies over HTTP
//! - **Relational fields**: `User.company` and `Company.users` resolved on demand
//! - **Pluggable storage**: in-memory or JSON-file collections behind one trait
//! - **CLI**: run the server or execute documents directly against the store
//!
//! ## Quick Start
//!
//! ```bash
//! # Initialize a project with file storage
//! roster init
//!
//! # Create a company
//! roster mutate 'createCompany(name: "Acme", slogan: "Go") { _id }'
//!
//! # List companies and their users
//! roster query '{ companies { name users { firstName age } } }'
//!
//! # Serve the API with GraphiQL on http://127.0.0.1:4000/graphql
//! roster serve
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions and handlers
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`graphql`]: GraphQL schema, resolvers and HTTP server
//! - [`model`]: Persisted records (User, Company)
//! - [`storage`]: Document collections and backends

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.roster.yml` configuration files and project discovery.
pub mod config;

/// Error types and result aliases.
///
/// Defines `RosterError` enum and `Result<T>` type alias.
pub mod error;

/// GraphQL schema and resolvers.
///
/// Provides the async-graphql schema and the axum server exposing it.
pub mod graphql;

/// Data models for roster.
///
/// Includes `User`, `Company` and the `Document` trait.
pub mod model;

/// Document storage.
///
/// The `Collection` trait and its in-memory and file-backed implementations.
pub mod storage;

pub mod logging;
