use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Statement,
    TransactionTrait,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::{SecurityConfig, SeedConfig};
use crate::entities::prelude::*;

pub mod migrator;
pub mod repositories;

pub use crate::entities::sent_emails::Model as SentEmail;
pub use crate::entities::templates::Model as Template;
pub use crate::entities::user_templates::Model as UserTemplate;
pub use crate::entities::users::{Gender, Model as User};
pub use repositories::admin::Admin;
pub use repositories::send_history::SendSummary;
pub use repositories::user::NewUser;

/// RFC 3339 UTC timestamp with fixed microsecond precision, so stored
/// values sort lexicographically in time order.
#[must_use]
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// What a seeding pass inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub users_created: u64,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn template_repo(&self) -> repositories::template::TemplateRepository {
        repositories::template::TemplateRepository::new(self.conn.clone())
    }

    fn delivery_repo(&self) -> repositories::delivery::DeliveryRepository {
        repositories::delivery::DeliveryRepository::new(self.conn.clone())
    }

    fn send_history_repo(&self) -> repositories::send_history::SendHistoryRepository {
        repositories::send_history::SendHistoryRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Admins
    // ========================================================================

    pub async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        self.admin_repo().get_by_username(username).await
    }

    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Admin> {
        self.admin_repo().create(username, password, security).await
    }

    pub async fn verify_admin_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Admin>> {
        self.admin_repo().verify_password(username, password).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get(id).await
    }

    pub async fn insert_users(&self, users: Vec<NewUser>) -> Result<u64> {
        self.user_repo().insert_many(users).await
    }

    // ========================================================================
    // Templates
    // ========================================================================

    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        self.template_repo().list_all().await
    }

    pub async fn get_template(&self, id: i32) -> Result<Option<Template>> {
        self.template_repo().get(id).await
    }

    pub async fn create_template(&self, name: &str, body: &str) -> Result<Template> {
        self.template_repo().create(name, body).await
    }

    pub async fn update_template(&self, id: i32, name: &str, body: &str) -> Result<Option<Template>> {
        self.template_repo().update(id, name, body).await
    }

    pub async fn delete_template(&self, id: i32) -> Result<bool> {
        self.template_repo().delete(id).await
    }

    // ========================================================================
    // Deliveries & history
    // ========================================================================

    pub async fn record_delivery(&self, user_id: i32, template_id: i32) -> Result<()> {
        self.delivery_repo()
            .record(user_id, template_id, &timestamp())
            .await
    }

    pub async fn get_delivery(&self, user_id: i32, template_id: i32) -> Result<Option<UserTemplate>> {
        self.delivery_repo().get(user_id, template_id).await
    }

    pub async fn count_deliveries_for_template(&self, template_id: i32) -> Result<u64> {
        self.delivery_repo().count_for_template(template_id).await
    }

    pub async fn record_send(&self, summary: SendSummary) -> Result<SentEmail> {
        self.send_history_repo().record(summary).await
    }

    pub async fn recent_sends(&self, limit: u64) -> Result<Vec<SentEmail>> {
        self.send_history_repo().recent(limit).await
    }

    // ========================================================================
    // Seeding & maintenance
    // ========================================================================

    /// Creates the bootstrap admin and demo recipients when their tables are
    /// empty. Safe to run on every startup.
    pub async fn seed(&self, seed: &SeedConfig, security: &SecurityConfig) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        if self.admin_repo().count().await? == 0 {
            self.create_admin(&seed.admin_username, &seed.admin_password, security)
                .await?;
            info!("Admin user '{}' created", seed.admin_username);
            report.admin_created = true;
        }

        if seed.demo_users && self.user_repo().count().await? == 0 {
            report.users_created = self.insert_users(demo_users(seed.demo_user_count)).await?;
            info!("Seeded {} demo users", report.users_created);
        }

        Ok(report)
    }

    /// Deletes every admin, user, template and delivery record. Send history
    /// is kept.
    pub async fn reset(&self) -> Result<()> {
        let txn = self.conn.begin().await?;

        UserTemplates::delete_many().exec(&txn).await?;
        Templates::delete_many().exec(&txn).await?;
        Users::delete_many().exec(&txn).await?;
        Admins::delete_many().exec(&txn).await?;

        txn.commit().await?;
        info!("All admin, user & template rows deleted");
        Ok(())
    }
}

fn demo_users(count: u32) -> Vec<NewUser> {
    if count == 0 {
        return Vec::new();
    }

    let mut users = vec![NewUser::new("Sahil", "mailidhaisahil@gmail.com")];
    users.extend((2..=count).map(|i| NewUser::new(format!("User {i}"), format!("user{i}@example.com"))));
    users
}
