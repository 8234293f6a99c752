use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

use error::Result;
use repository::{
    AthleteRepository, UserRepository,
    memory::{MemoryAthleteRepository, MemoryUserRepository},
    postgres::{PgAthleteRepository, PgUserRepository},
};

/// Shared Postgres pool handle.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies the embedded migrations. Every statement is create-if-absent,
    /// so running against an already provisioned database is a no-op.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// The storage medium chosen once at startup.
#[derive(Clone)]
pub enum Backend {
    Postgres(Database),
    Memory,
}

impl Backend {
    /// Connects to Postgres when a connection string is given, otherwise
    /// falls back to process-local storage.
    pub async fn connect(database_url: Option<&str>) -> Result<Self> {
        match database_url {
            Some(url) => {
                let db = Database::new(url).await?;
                db.run_migrations().await?;
                Ok(Self::Postgres(db))
            }
            None => Ok(Self::Memory),
        }
    }

    pub fn database(&self) -> Option<&Database> {
        match self {
            Self::Postgres(db) => Some(db),
            Self::Memory => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory => "memory",
        }
    }

    /// Call once per process: each call on the memory variant yields a
    /// fresh, empty collection.
    pub fn athletes(&self) -> Arc<dyn AthleteRepository> {
        match self {
            Self::Postgres(db) => Arc::new(PgAthleteRepository::new(db.pool().clone())),
            Self::Memory => Arc::new(MemoryAthleteRepository::new()),
        }
    }

    /// Same caveat as [`Backend::athletes`].
    pub fn users(&self) -> Arc<dyn UserRepository> {
        match self {
            Self::Postgres(db) => Arc::new(PgUserRepository::new(db.pool().clone())),
            Self::Memory => Arc::new(MemoryUserRepository::new()),
        }
    }
}
