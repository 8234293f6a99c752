use std::sync::Arc;

use anyhow::{Context, Result};
use storage::{
    Database,
    repository::{AthleteRepository, UserRepository},
    services::AthleteStore,
};

use crate::config::Config;
use crate::features::auth::services::TokenKeys;
use crate::features::upload::services::UploadSink;

/// Handles shared by every request. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub athletes: AthleteStore,
    pub users: Arc<dyn UserRepository>,
    pub database: Option<Database>,
    pub tokens: Arc<TokenKeys>,
    pub uploads: Arc<UploadSink>,
}

impl AppState {
    pub fn new(
        config: Config,
        athletes: Arc<dyn AthleteRepository>,
        users: Arc<dyn UserRepository>,
        database: Option<Database>,
    ) -> Result<Self> {
        let tokens = TokenKeys::new(&config.jwt_secret, config.token_ttl_hours);
        let uploads =
            UploadSink::new(&config.upload).context("Failed to prepare upload directory")?;

        Ok(Self {
            config: Arc::new(config),
            athletes: AthleteStore::new(athletes),
            users,
            database,
            tokens: Arc::new(tokens),
            uploads: Arc::new(uploads),
        })
    }
}
