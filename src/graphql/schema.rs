use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, ID, MaybeUndefined, Object, Schema,
};

use crate::error::{Result, RosterError};
use crate::model::{Company, CompanyFields, RecordKind, User, UserFields};
use crate::storage::Database;

use super::context::RequestContext;
use super::types::*;

pub type RosterSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(database: Database) -> RosterSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(database)
        .finish()
}

fn get_db<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Database> {
    ctx.data::<Database>()
}

async fn require_user(db: &Database, id: &str) -> Result<User> {
    db.users
        .find_by_id(id)
        .await?
        .ok_or_else(|| RosterError::not_found(RecordKind::User, id))
}

async fn require_company(db: &Database, id: &str) -> Result<Company> {
    db.companies
        .find_by_id(id)
        .await?
        .ok_or_else(|| RosterError::not_found(RecordKind::Company, id))
}

/// A company reference given to a mutation must resolve at the time of the check.
async fn check_company_reference(db: &Database, id: &str) -> Result<()> {
    match db.companies.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(RosterError::invalid_reference(RecordKind::Company, id)),
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get a single user by ID
    async fn user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<UserType> {
        let db = get_db(ctx)?;
        let user = require_user(db, &id).await.map_err(|e| e.extend())?;
        Ok(user.into())
    }

    /// List all users
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserType>> {
        let request = ctx.data_opt::<RequestContext>();
        tracing::info!(context = ?request, "Listing users");

        let db = get_db(ctx)?;
        let users = db.users.find(None).await.map_err(|e| e.extend())?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Get a single company by ID
    async fn company(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<CompanyType> {
        let db = get_db(ctx)?;
        let company = require_company(db, &id).await.map_err(|e| e.extend())?;
        Ok(company.into())
    }

    /// List all companies
    async fn companies(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<CompanyType>> {
        let db = get_db(ctx)?;
        let companies = db.companies.find(None).await.map_err(|e| e.extend())?;
        Ok(companies.into_iter().map(Into::into).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a user belonging to an existing company
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        first_name: String,
        age: i32,
        company_id: ID,
    ) -> async_graphql::Result<UserType> {
        let db = get_db(ctx)?;
        create_user(db, first_name, age, company_id.0)
            .await
            .map(Into::into)
            .map_err(|e| e.extend())
    }

    /// Update a user; omitted arguments keep their stored value
    ///
    /// `companyId: null` detaches the user from its company.
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        first_name: Option<String>,
        age: Option<i32>,
        company_id: MaybeUndefined<ID>,
    ) -> async_graphql::Result<UserType> {
        let db = get_db(ctx)?;
        let company_id = company_id.map_value(|company_id| company_id.0);
        update_user(db, &id, first_name, age, company_id)
            .await
            .map(Into::into)
            .map_err(|e| e.extend())
    }

    /// Delete a user, returning it as it was before deletion
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<UserType> {
        let db = get_db(ctx)?;
        let deleted = db
            .users
            .find_by_id_and_delete(&id)
            .await
            .and_then(|user| user.ok_or_else(|| RosterError::not_found(RecordKind::User, &*id)))
            .map_err(|e| e.extend())?;
        Ok(deleted.into())
    }

    /// Create a company
    async fn create_company(
        &self,
        ctx: &Context<'_>,
        name: String,
        slogan: String,
    ) -> async_graphql::Result<CompanyType> {
        let db = get_db(ctx)?;
        let company = db
            .companies
            .create(CompanyFields::new(name, slogan))
            .await
            .map_err(|e| e.extend())?;
        Ok(company.into())
    }

    /// Update a company; omitted arguments keep their stored value
    async fn update_company(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        slogan: Option<String>,
    ) -> async_graphql::Result<CompanyType> {
        let db = get_db(ctx)?;
        update_company(db, &id, name, slogan)
            .await
            .map(Into::into)
            .map_err(|e| e.extend())
    }

    /// Delete a company, returning it as it was before deletion
    ///
    /// Users keep their reference to the deleted company.
    async fn delete_company(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<CompanyType> {
        let db = get_db(ctx)?;
        let deleted = db
            .companies
            .find_by_id_and_delete(&id)
            .await
            .and_then(|company| {
                company.ok_or_else(|| RosterError::not_found(RecordKind::Company, &*id))
            })
            .map_err(|e| e.extend())?;
        Ok(deleted.into())
    }
}

async fn create_user(
    db: &Database,
    first_name: String,
    age: i32,
    company_id: String,
) -> Result<User> {
    // Not atomic with respect to a concurrent deleteCompany.
    check_company_reference(db, &company_id).await?;
    db.users
        .create(UserFields::new(first_name, age).with_company(company_id))
        .await
}

async fn update_user(
    db: &Database,
    id: &str,
    first_name: Option<String>,
    age: Option<i32>,
    company_id: MaybeUndefined<String>,
) -> Result<User> {
    let mut fields = require_user(db, id).await?.fields();

    if let Some(first_name) = first_name {
        fields.first_name = first_name;
    }
    if let Some(age) = age {
        fields.age = age;
    }
    match company_id {
        MaybeUndefined::Undefined => {}
        MaybeUndefined::Null => fields.company_id = None,
        MaybeUndefined::Value(company_id) => {
            check_company_reference(db, &company_id).await?;
            fields.company_id = Some(company_id);
        }
    }

    db.users
        .find_by_id_and_update(id, fields)
        .await?
        .ok_or_else(|| RosterError::not_found(RecordKind::User, id))
}

async fn update_company(
    db: &Database,
    id: &str,
    name: Option<String>,
    slogan: Option<String>,
) -> Result<Company> {
    let mut fields = require_company(db, id).await?.fields();

    if let Some(name) = name {
        fields.name = name;
    }
    if let Some(slogan) = slogan {
        fields.slogan = slogan;
    }

    db.companies
        .find_by_id_and_update(id, fields)
        .await?
        .ok_or_else(|| RosterError::not_found(RecordKind::Company, id))
}
