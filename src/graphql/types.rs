use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, SimpleObject};

use crate::model::{Company as ModelCompany, User as ModelUser};
use crate::storage::{Database, Filter};

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "User", complex)]
pub struct UserType {
    #[graphql(name = "_id")]
    pub id: ID,
    pub first_name: String,
    pub age: i32,
    #[graphql(skip)]
    pub company_id: Option<String>,
}

#[ComplexObject]
impl UserType {
    /// The company this user belongs to; null when unset or no longer stored
    async fn company(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<CompanyType>> {
        let Some(company_id) = self.company_id.as_deref() else {
            return Ok(None);
        };
        let db = ctx.data::<Database>()?;
        let company = db
            .companies
            .find_by_id(company_id)
            .await
            .map_err(|e| e.extend())?;
        Ok(company.map(Into::into))
    }
}

impl From<ModelUser> for UserType {
    fn from(u: ModelUser) -> Self {
        Self {
            id: u.id.into(),
            first_name: u.first_name,
            age: u.age,
            company_id: u.company_id,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "Company", complex)]
pub struct CompanyType {
    #[graphql(name = "_id")]
    pub id: ID,
    pub name: String,
    pub slogan: String,
}

#[ComplexObject]
impl CompanyType {
    /// Users whose company is this one
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserType>> {
        let db = ctx.data::<Database>()?;
        let filter = Filter::new().eq("companyId", self.id.as_str());
        let users = db
            .users
            .find(Some(&filter))
            .await
            .map_err(|e| e.extend())?;
        Ok(users.into_iter().map(Into::into).collect())
    }
}

impl From<ModelCompany> for CompanyType {
    fn from(c: ModelCompany) -> Self {
        Self {
            id: c.id.into(),
            name: c.name,
            slogan: c.slogan,
        }
    }
}
