use serde::{Deserialize, Serialize};

use super::{Document, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    pub first_name: String,

    pub age: i32,

    /// Not enforced as a foreign key: may dangle after the company is deleted.
    #[serde(default)]
    pub company_id: Option<String>,
}

/// Writable fields of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub first_name: String,
    pub age: i32,
    pub company_id: Option<String>,
}

impl UserFields {
    pub fn new(first_name: impl Into<String>, age: i32) -> Self {
        Self {
            first_name: first_name.into(),
            age,
            company_id: None,
        }
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }
}

impl User {
    pub fn fields(&self) -> UserFields {
        UserFields {
            first_name: self.first_name.clone(),
            age: self.age,
            company_id: self.company_id.clone(),
        }
    }
}

impl Document for User {
    type Fields = UserFields;

    const KIND: RecordKind = RecordKind::User;

    fn from_fields(id: String, fields: UserFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            age: fields.age,
            company_id: fields.company_id,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_with_document_field_names() {
        let fields = UserFields::new("Ann", 30).with_company("c1");
        let user = User::from_fields("u1".to_string(), fields);
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["_id"], "u1");
        assert_eq!(value["firstName"], "Ann");
        assert_eq!(value["age"], 30);
        assert_eq!(value["companyId"], "c1");
    }

    #[test]
    fn test_user_without_company_id_deserializes() {
        let user: User =
            serde_json::from_str(r#"{"_id":"u2","firstName":"Bob","age":41}"#).unwrap();
        assert_eq!(user.company_id, None);
        assert_eq!(user.fields(), UserFields::new("Bob", 41));
    }
}
