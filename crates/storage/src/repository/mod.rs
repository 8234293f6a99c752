//! Storage interface shared by the Postgres and in-memory variants.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Athlete, User};

pub mod memory;
pub mod postgres;

#[async_trait]
pub trait AthleteRepository: Send + Sync {
    /// Newest records first.
    async fn list(&self) -> Result<Vec<Athlete>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Athlete>>;

    async fn insert(&self, athlete: &Athlete) -> Result<()>;

    /// Overwrites the stored record with the same id. Fails with
    /// `StorageError::NotFound` if the record vanished in the meantime.
    async fn replace(&self, athlete: &Athlete) -> Result<()>;

    /// Unconditional delete; succeeds whether or not the id existed.
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>>;
}
