use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{AthleteRepository, UserRepository};
use crate::dto::common::LIST_WINDOW;
use crate::error::{Result, StorageError};
use crate::models::{Athlete, AthleteRow, User};

const ATHLETE_COLUMNS: &str = "id, first_name, last_name, sport, age, avatar_url, video_url, \
                               team, metrics, created_at, updated_at";

pub struct PgAthleteRepository {
    pool: PgPool,
}

impl PgAthleteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AthleteRepository for PgAthleteRepository {
    async fn list(&self) -> Result<Vec<Athlete>> {
        let rows = sqlx::query_as::<_, AthleteRow>(&format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(LIST_WINDOW)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Athlete::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Athlete>> {
        let row = sqlx::query_as::<_, AthleteRow>(&format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Athlete::from))
    }

    async fn insert(&self, athlete: &Athlete) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO athletes (id, first_name, last_name, sport, age, avatar_url,
                                  video_url, team, metrics, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&athlete.id)
        .bind(&athlete.first_name)
        .bind(&athlete.last_name)
        .bind(&athlete.sport)
        .bind(athlete.age)
        .bind(&athlete.avatar_url)
        .bind(&athlete.video_url)
        .bind(&athlete.team)
        .bind(athlete.metrics.as_ref().map(Json))
        .bind(athlete.created_at)
        .bind(athlete.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace(&self, athlete: &Athlete) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE athletes
            SET first_name = $2,
                last_name = $3,
                sport = $4,
                age = $5,
                avatar_url = $6,
                video_url = $7,
                team = $8,
                metrics = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(&athlete.id)
        .bind(&athlete.first_name)
        .bind(&athlete.last_name)
        .bind(&athlete.sport)
        .bind(athlete.age)
        .bind(&athlete.avatar_url)
        .bind(&athlete.video_url)
        .bind(&athlete.team)
        .bind(athlete.metrics.as_ref().map(Json))
        .bind(athlete.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM athletes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>> {
        let roles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }
}
