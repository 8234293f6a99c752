use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::athlete::{CreateAthleteRequest, UpdateAthleteRequest};
use crate::dto::common::ListResponse;
use crate::error::{Result, StorageError};
use crate::models::Athlete;
use crate::repository::AthleteRepository;

/// The single logical athlete collection, whichever medium backs it.
#[derive(Clone)]
pub struct AthleteStore {
    repo: Arc<dyn AthleteRepository>,
}

impl AthleteStore {
    pub fn new(repo: Arc<dyn AthleteRepository>) -> Self {
        Self { repo }
    }

    /// List athletes, newest first
    pub async fn list(&self) -> Result<ListResponse<Athlete>> {
        let athletes = self.repo.list().await?;
        Ok(ListResponse::new(athletes))
    }

    /// Create a new athlete with a fresh id and timestamps
    pub async fn create(&self, req: CreateAthleteRequest) -> Result<Athlete> {
        req.validate()?;

        let first_name = required(req.first_name, "firstName")?;
        let last_name = required(req.last_name, "lastName")?;
        let sport = required(req.sport, "sport")?;
        let age = required(req.age, "age")?;

        let now = now();
        let athlete = Athlete {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            sport,
            age,
            avatar_url: req.avatar_url,
            video_url: req.video_url,
            team: req.team,
            metrics: req.metrics,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&athlete).await?;
        tracing::info!(athlete_id = %athlete.id, "Athlete created");

        Ok(athlete)
    }

    /// Merge a patch over an existing athlete
    pub async fn update(&self, id: &str, patch: UpdateAthleteRequest) -> Result<Athlete> {
        patch.validate()?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let updated = apply_patch(existing, patch, now());
        self.repo.replace(&updated).await?;
        tracing::debug!(athlete_id = %updated.id, "Athlete updated");

        Ok(updated)
    }

    /// Delete an athlete. Absent ids are not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete(id).await?;
        tracing::info!(athlete_id = %id, "Athlete deleted");
        Ok(())
    }
}

// Millisecond precision is what survives a Postgres round trip unchanged
// and what clients already expect from ISO-8601 strings.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or_else(|| {
        let mut error = ValidationError::new("required");
        error.message = Some(format!("{} is required", field).into());
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        StorageError::Validation(errors)
    })
}

fn apply_patch(existing: Athlete, patch: UpdateAthleteRequest, now: DateTime<Utc>) -> Athlete {
    Athlete {
        id: existing.id,
        first_name: patch.first_name.unwrap_or(existing.first_name),
        last_name: patch.last_name.unwrap_or(existing.last_name),
        sport: patch.sport.unwrap_or(existing.sport),
        age: patch.age.unwrap_or(existing.age),
        avatar_url: patch.avatar_url.or(existing.avatar_url),
        video_url: patch.video_url.or(existing.video_url),
        team: patch.team.or(existing.team),
        metrics: patch.metrics.or(existing.metrics),
        created_at: existing.created_at,
        updated_at: now.max(existing.updated_at),
    }
}
