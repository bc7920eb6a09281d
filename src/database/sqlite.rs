// ABOUTME: SQLite implementation of the FitnessStore trait using sqlx
// ABOUTME: Schema migration, row mapping, and pushed-down aggregate queries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2026 WedFit

//! SQLite-backed [`FitnessStore`].
//!
//! Timestamps are stored as RFC 3339 TEXT; since every value is written in
//! UTC with the same formatting, lexicographic `ORDER BY date DESC` is
//! chronological. Derived reads (latest weight, personal-best run) are
//! pushed down as queries instead of scanning history in the application.

use super::FitnessStore;
use crate::models::{ChatMessage, EatingWellEntry, Goal, RunEntry, User, UserProfile, WeightEntry};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// SQLite storage backend
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `database_url` and run
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the schema migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }

    /// Run database migrations to set up the schema
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_active TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY REFERENCES users(id),
                username TEXT,
                profile_picture TEXT,
                initial_weight REAL,
                target_weight REAL,
                target_miles REAL,
                target_streak INTEGER,
                onboarded BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS weight_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                weight REAL NOT NULL,
                date TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_weight_entries_user_date
             ON weight_entries(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS run_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                distance REAL NOT NULL,
                date TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_run_entries_user_date
             ON run_entries(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS eating_well_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                ate_well BOOLEAN NOT NULL DEFAULT TRUE,
                date TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_eating_well_entries_user_date
             ON eating_well_entries(user_id, date)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                username TEXT NOT NULL,
                profile_picture TEXT,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_created_at
             ON chat_messages(created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    let id_str: String = row.try_get("id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let last_active_str: String = row.try_get("last_active")?;

    Ok(User {
        id: Uuid::parse_str(&id_str)?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: parse_datetime(&created_at_str)?,
        last_active: parse_datetime(&last_active_str)?,
        is_active: row.try_get("is_active")?,
    })
}

fn row_to_profile(row: &SqliteRow) -> Result<UserProfile> {
    let user_id_str: String = row.try_get("user_id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let updated_at_str: String = row.try_get("updated_at")?;

    Ok(UserProfile {
        user_id: Uuid::parse_str(&user_id_str)?,
        username: row.try_get("username")?,
        profile_picture: row.try_get("profile_picture")?,
        initial_weight: row.try_get("initial_weight")?,
        goal: Goal {
            target_weight: row.try_get("target_weight")?,
            target_miles: row.try_get("target_miles")?,
            target_streak: row.try_get("target_streak")?,
        },
        onboarded: row.try_get("onboarded")?,
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}

fn row_to_weight_entry(row: &SqliteRow) -> Result<WeightEntry> {
    let date_str: String = row.try_get("date")?;
    Ok(WeightEntry {
        date: parse_datetime(&date_str)?,
        weight: row.try_get("weight")?,
    })
}

fn row_to_run_entry(row: &SqliteRow) -> Result<RunEntry> {
    let date_str: String = row.try_get("date")?;
    Ok(RunEntry {
        date: parse_datetime(&date_str)?,
        distance: row.try_get("distance")?,
    })
}

fn row_to_eating_well_entry(row: &SqliteRow) -> Result<EatingWellEntry> {
    let date_str: String = row.try_get("date")?;
    Ok(EatingWellEntry {
        date: parse_datetime(&date_str)?,
        ate_well: row.try_get("ate_well")?,
    })
}

fn row_to_chat_message(row: &SqliteRow) -> Result<ChatMessage> {
    let id_str: String = row.try_get("id")?;
    let user_id_str: String = row.try_get("user_id")?;
    let created_at_str: String = row.try_get("created_at")?;

    Ok(ChatMessage {
        id: Uuid::parse_str(&id_str)?,
        user_id: Uuid::parse_str(&user_id_str)?,
        username: row.try_get("username")?,
        profile_picture: row.try_get("profile_picture")?,
        message: row.try_get("message")?,
        created_at: parse_datetime(&created_at_str)?,
    })
}

#[async_trait]
impl FitnessStore for SqliteStore {
    async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, password_hash, created_at, last_active, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .bind(user.last_active.to_rfc3339())
        .bind(user.is_active)
        .execute(&self.pool)
        .await?;

        Ok(user.id)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn update_last_active(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_active = ?1 WHERE id = ?2")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let row = sqlx::query("SELECT * FROM user_profiles WHERE user_id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO user_profiles (
                user_id, username, profile_picture, initial_weight,
                target_weight, target_miles, target_streak,
                onboarded, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                profile_picture = excluded.profile_picture,
                initial_weight = excluded.initial_weight,
                target_weight = excluded.target_weight,
                target_miles = excluded.target_miles,
                target_streak = excluded.target_streak,
                onboarded = excluded.onboarded,
                updated_at = excluded.updated_at
            ",
        )
        .bind(profile.user_id.to_string())
        .bind(&profile.username)
        .bind(&profile.profile_picture)
        .bind(profile.initial_weight)
        .bind(profile.goal.target_weight)
        .bind(profile.goal.target_miles)
        .bind(profile.goal.target_streak)
        .bind(profile.onboarded)
        .bind(profile.created_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn complete_onboarding(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            "UPDATE user_profiles SET onboarded = TRUE, updated_at = ?1 WHERE user_id = ?2",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_onboarded_profiles(&self) -> Result<Vec<UserProfile>> {
        let rows = sqlx::query("SELECT * FROM user_profiles WHERE onboarded = TRUE")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_profile).collect()
    }

    async fn add_weight_entry(&self, user_id: Uuid, entry: &WeightEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO weight_entries (id, user_id, weight, date) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(entry.weight)
        .bind(entry.date.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn weight_history(&self, user_id: Uuid) -> Result<Vec<WeightEntry>> {
        let rows = sqlx::query(
            "SELECT weight, date FROM weight_entries WHERE user_id = ?1 ORDER BY date DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_weight_entry).collect()
    }

    async fn latest_weight(&self, user_id: Uuid) -> Result<Option<WeightEntry>> {
        let row = sqlx::query(
            "SELECT weight, date FROM weight_entries
             WHERE user_id = ?1 ORDER BY date DESC LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_weight_entry).transpose()
    }

    async fn add_run_entry(&self, user_id: Uuid, entry: &RunEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO run_entries (id, user_id, distance, date) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(entry.distance)
        .bind(entry.date.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn run_history(&self, user_id: Uuid) -> Result<Vec<RunEntry>> {
        let rows = sqlx::query(
            "SELECT distance, date FROM run_entries WHERE user_id = ?1 ORDER BY date DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_run_entry).collect()
    }

    async fn max_run_distance(&self, user_id: Uuid) -> Result<f64> {
        let row = sqlx::query(
            "SELECT COALESCE(MAX(distance), 0.0) AS max_distance
             FROM run_entries WHERE user_id = ?1",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("max_distance")?)
    }

    async fn add_eating_well_entry(&self, user_id: Uuid, entry: &EatingWellEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO eating_well_entries (id, user_id, ate_well, date)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(entry.ate_well)
        .bind(entry.date.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn eating_well_history(&self, user_id: Uuid) -> Result<Vec<EatingWellEntry>> {
        let rows = sqlx::query(
            "SELECT ate_well, date FROM eating_well_entries
             WHERE user_id = ?1 ORDER BY date DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_eating_well_entry).collect()
    }

    async fn add_chat_message(&self, message: &ChatMessage) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO chat_messages (id, user_id, username, profile_picture, message, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(message.id.to_string())
        .bind(message.user_id.to_string())
        .bind(&message.username)
        .bind(&message.profile_picture)
        .bind(&message.message)
        .bind(message.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent_chat_messages(&self, limit: u32) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages ORDER BY created_at DESC LIMIT ?1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_chat_message).collect()
    }
}
