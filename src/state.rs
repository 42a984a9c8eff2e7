use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::mailer::{self, MailTransport};
use crate::services::token::TokenIssuer;
use crate::services::{
    AuthService, DispatchService, SeaOrmAuthService, SeaOrmDispatchService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub mailer: Arc<dyn MailTransport>,

    pub auth_service: Arc<dyn AuthService>,

    pub dispatch_service: Arc<dyn DispatchService>,
}

impl SharedState {
    /// Builds the store and the configured mail transport.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let mailer = mailer::build_transport(&config.mail)?;
        Self::with_mailer(config, mailer).await
    }

    /// Same as [`SharedState::new`] with a caller-supplied transport.
    pub async fn with_mailer(
        config: Config,
        mailer: Arc<dyn MailTransport>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = TokenIssuer::from_config(&config.security);

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), tokens))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let dispatch_service = Arc::new(SeaOrmDispatchService::new(
            store.clone(),
            mailer.clone(),
            config.mail.sender(),
        )) as Arc<dyn DispatchService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            mailer,
            auth_service,
            dispatch_service,
        })
    }
}
