use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};

use crate::entities::{prelude::*, users};

/// Recipient to insert. Users are only created through seeding.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub user_email: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub gender: Option<users::Gender>,
}

impl NewUser {
    #[must_use]
    pub fn new(user_name: impl Into<String>, user_email: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            user_email: user_email.into(),
            city: None,
            state: None,
            gender: None,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<users::Model>> {
        Users::find()
            .order_by_asc(users::Column::UserId)
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    pub async fn get(&self, id: i32) -> Result<Option<users::Model>> {
        Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    pub async fn count(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    pub async fn insert_many(&self, users: Vec<NewUser>) -> Result<u64> {
        if users.is_empty() {
            return Ok(0);
        }

        let total = users.len() as u64;
        let models: Vec<users::ActiveModel> = users
            .into_iter()
            .map(|u| users::ActiveModel {
                user_name: Set(u.user_name),
                user_email: Set(u.user_email),
                city: Set(u.city),
                state: Set(u.state),
                gender: Set(u.gender),
                ..Default::default()
            })
            .collect();

        Users::insert_many(models)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert users")?;

        Ok(total)
    }
}
