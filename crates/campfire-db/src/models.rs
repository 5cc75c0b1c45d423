//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidRole(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidRole(s) => write!(f, "Invalid role: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// User role
///
/// Admin accounts may mutate or delete any user's stories and relays;
/// standard accounts only their own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Standard,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Role::Standard),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseError::InvalidRole(s.to_string())),
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub password_hash: String,
    pub role: Role,
}

/// Story model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub is_finished: bool,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New story (for insertion)
#[derive(Debug, Clone)]
pub struct NewStory {
    pub user_id: i64,
    pub title: String,
    pub content: String,
}

/// Story with its author's nickname, as returned by list queries
#[derive(Debug, Clone, Serialize)]
pub struct StorySummary {
    pub id: i64,
    pub nickname: String,
    pub title: String,
    pub content: String,
    pub is_finished: bool,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Relay model: a continuation appended to a parent story
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relay {
    pub id: i64,
    pub story_id: i64,
    pub user_id: i64,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New relay (for insertion)
#[derive(Debug, Clone)]
pub struct NewRelay {
    pub story_id: i64,
    pub user_id: i64,
    pub content: String,
}

/// Fields a story update may change. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct StoryUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_finished: Option<bool>,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let role_str: String = row.try_get("role")?;
        Ok(User {
            id: row.try_get("id")?,
            nickname: row.try_get("nickname")?,
            password_hash: row.try_get("password_hash")?,
            role: Role::from_str(&role_str).unwrap_or(Role::Standard),
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Story {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Story {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            is_finished: row.try_get("is_finished")?,
            like_count: row.try_get("like_count")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for StorySummary {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(StorySummary {
            id: row.try_get("id")?,
            nickname: row.try_get("nickname")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            is_finished: row.try_get("is_finished")?,
            like_count: row.try_get("like_count")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Relay {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Relay {
            id: row.try_get("id")?,
            story_id: row.try_get("story_id")?,
            user_id: row.try_get("user_id")?,
            content: row.try_get("content")?,
            like_count: row.try_get("like_count")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
