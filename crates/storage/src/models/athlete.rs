use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;

/// Optional performance figures. Ranges are a client concern only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Metrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endurance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub sport: String,
    pub age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the `athletes` table.
#[derive(Debug, FromRow)]
pub struct AthleteRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub sport: String,
    pub age: i32,
    pub avatar_url: Option<String>,
    pub video_url: Option<String>,
    pub team: Option<String>,
    pub metrics: Option<Json<Metrics>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AthleteRow> for Athlete {
    fn from(row: AthleteRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            sport: row.sport,
            age: row.age,
            avatar_url: row.avatar_url,
            video_url: row.video_url,
            team: row.team,
            metrics: row.metrics.map(|Json(m)| m),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
