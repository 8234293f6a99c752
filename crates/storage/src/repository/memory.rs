//! Process-local storage. Nothing here survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{AthleteRepository, UserRepository};
use crate::error::{Result, StorageError};
use crate::models::{Athlete, User};

/// Athletes kept newest-first. Listing is unbounded.
#[derive(Default)]
pub struct MemoryAthleteRepository {
    athletes: RwLock<Vec<Athlete>>,
}

impl MemoryAthleteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AthleteRepository for MemoryAthleteRepository {
    async fn list(&self) -> Result<Vec<Athlete>> {
        Ok(self.athletes.read().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Athlete>> {
        Ok(self.athletes.read().iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, athlete: &Athlete) -> Result<()> {
        self.athletes.write().insert(0, athlete.clone());
        Ok(())
    }

    async fn replace(&self, athlete: &Athlete) -> Result<()> {
        let mut athletes = self.athletes.write();
        let slot = athletes
            .iter_mut()
            .find(|a| a.id == athlete.id)
            .ok_or(StorageError::NotFound)?;
        *slot = athlete.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.athletes.write().retain(|a| a.id != id);
        Ok(())
    }
}

/// Accounts with their role names, keyed by email.
#[derive(Default)]
pub struct MemoryUserRepository {
    accounts: RwLock<HashMap<String, (User, Vec<String>)>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = (User, Vec<String>)>) -> Self {
        let repo = Self::new();
        for (user, roles) in accounts {
            repo.add(user, roles);
        }
        repo
    }

    pub fn add(&self, user: User, roles: Vec<String>) {
        self.accounts
            .write()
            .insert(user.email.clone(), (user, roles));
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.accounts.read().get(email).map(|(user, _)| user.clone()))
    }

    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>> {
        let roles = self
            .accounts
            .read()
            .values()
            .find(|(user, _)| user.id == user_id)
            .map(|(_, roles)| roles.clone())
            .unwrap_or_default();
        Ok(roles)
    }
}
