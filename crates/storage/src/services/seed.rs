//! Demo roles, accounts and athletes for a fresh database.

use chrono::{SubsecRound, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::Database;
use crate::error::Result;
use crate::models::{Metrics, ROLE_ADMIN, ROLE_ATHLETE, ROLE_COACH};

pub struct DemoAccount {
    pub id: Uuid,
    pub email: &'static str,
    pub full_name: &'static str,
    pub password: &'static str,
    pub role: &'static str,
}

pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        id: Uuid::from_u128(0x11111111_1111_1111_1111_111111111111),
        email: "admin@example.com",
        full_name: "Admin User",
        password: "admin123",
        role: ROLE_ADMIN,
    },
    DemoAccount {
        id: Uuid::from_u128(0x22222222_2222_2222_2222_222222222222),
        email: "coach@example.com",
        full_name: "Coach User",
        password: "coach123",
        role: ROLE_COACH,
    },
    DemoAccount {
        id: Uuid::from_u128(0x33333333_3333_3333_3333_333333333333),
        email: "athlete@example.com",
        full_name: "Athlete User",
        password: "athlete123",
        role: ROLE_ATHLETE,
    },
];

/// A demo account whose password has already been hashed.
pub struct SeedAccount<'a> {
    pub account: &'a DemoAccount,
    pub password_hash: String,
}

struct DemoAthlete {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    sport: &'static str,
    age: i32,
    team: &'static str,
    metrics: (f64, f64, f64),
}

const DEMO_ATHLETES: [DemoAthlete; 3] = [
    DemoAthlete {
        id: "demo-athlete-1",
        first_name: "Ivan",
        last_name: "Petrov",
        sport: "Swimming",
        age: 17,
        team: "Alpha",
        metrics: (2.1, 78.0, 64.0),
    },
    DemoAthlete {
        id: "demo-athlete-2",
        first_name: "Maria",
        last_name: "Sokolova",
        sport: "Athletics",
        age: 19,
        team: "Alpha",
        metrics: (9.4, 85.0, 58.0),
    },
    DemoAthlete {
        id: "demo-athlete-3",
        first_name: "Alexei",
        last_name: "Volkov",
        sport: "Weightlifting",
        age: 22,
        team: "Bravo",
        metrics: (5.2, 61.0, 93.0),
    },
];

/// Runs all seed statements in one transaction. Safe to repeat: roles and
/// athletes are insert-if-absent, accounts are upserted.
pub async fn seed_demo_data(db: &Database, accounts: &[SeedAccount<'_>]) -> Result<()> {
    let mut tx = db.pool().begin().await?;

    for role in [ROLE_ADMIN, ROLE_COACH, ROLE_ATHLETE] {
        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(role)
            .execute(&mut *tx)
            .await?;
    }

    for seed in accounts {
        let account = seed.account;
        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                full_name = EXCLUDED.full_name,
                password_hash = EXCLUDED.password_hash
            "#,
        )
        .bind(account.id)
        .bind(account.email)
        .bind(account.full_name)
        .bind(&seed.password_hash)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            SELECT $1, id FROM roles WHERE name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(account.id)
        .bind(account.role)
        .execute(&mut *tx)
        .await?;
    }

    let now = Utc::now().trunc_subsecs(3);
    for athlete in &DEMO_ATHLETES {
        let (speed, endurance, strength) = athlete.metrics;
        let metrics = Metrics {
            speed: Some(speed),
            endurance: Some(endurance),
            strength: Some(strength),
        };

        sqlx::query(
            r#"
            INSERT INTO athletes (id, first_name, last_name, sport, age, team, metrics,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(athlete.id)
        .bind(athlete.first_name)
        .bind(athlete.last_name)
        .bind(athlete.sport)
        .bind(athlete.age)
        .bind(athlete.team)
        .bind(Json(metrics))
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(accounts = accounts.len(), "Demo data seeded");

    Ok(())
}
