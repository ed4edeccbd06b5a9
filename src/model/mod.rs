//! Data models for roster.
//!
//! This module defines the persisted records:
//!
//! - [`User`]: a person, optionally belonging to a company
//! - [`Company`]: an organisation users can belong to
//! - [`Document`]: ties a record type to its collection and writable fields

mod company;
mod user;

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use company::{Company, CompanyFields};
pub use user::{User, UserFields};

/// The kinds of record stored by roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Company,
}

impl RecordKind {
    /// Name of the collection documents of this kind live in.
    pub fn collection(self) -> &'static str {
        match self {
            RecordKind::User => "users",
            RecordKind::Company => "companies",
        }
    }

    /// Capitalised name, for messages that start with the kind.
    pub fn title(self) -> &'static str {
        match self {
            RecordKind::User => "User",
            RecordKind::Company => "Company",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::User => write!(f, "user"),
            RecordKind::Company => write!(f, "company"),
        }
    }
}

/// A record persisted in a collection.
///
/// A document is an identity plus a set of writable fields. Stores assign the
/// identity on create and replace the fields on update.
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Fields: Clone + Send + Sync + 'static;

    const KIND: RecordKind;

    fn from_fields(id: String, fields: Self::Fields) -> Self;

    fn id(&self) -> &str;
}
