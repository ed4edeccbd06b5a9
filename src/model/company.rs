use serde::{Deserialize, Serialize};

use super::{Document, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub slogan: String,
}

/// Writable fields of a [`Company`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFields {
    pub name: String,
    pub slogan: String,
}

impl CompanyFields {
    pub fn new(name: impl Into<String>, slogan: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slogan: slogan.into(),
        }
    }
}

impl Company {
    pub fn fields(&self) -> CompanyFields {
        CompanyFields::new(self.name.clone(), self.slogan.clone())
    }
}

impl Document for Company {
    type Fields = CompanyFields;

    const KIND: RecordKind = RecordKind::Company;

    fn from_fields(id: String, fields: CompanyFields) -> Self {
        Self {
            id,
            name: fields.name,
            slogan: fields.slogan,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}
