//! Relay operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewRelay, Relay};
use crate::repository::Database;

impl Database {
    // ==================== Relay Operations ====================

    /// Insert a new relay continuation
    pub async fn insert_relay(&self, relay: NewRelay) -> Result<Relay, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO relays (story_id, user_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(relay.story_id)
        .bind(relay.user_id)
        .bind(&relay.content)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Relay {
            id,
            story_id: relay.story_id,
            user_id: relay.user_id,
            content: relay.content,
            like_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// List the relays appended to a story, oldest first
    pub async fn list_relays(&self, story_id: i64) -> Result<Vec<Relay>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, story_id, user_id, content, like_count, created_at, updated_at
            FROM relays
            WHERE story_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(story_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Relay::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Get a relay by ID
    pub async fn get_relay_by_id(&self, id: i64) -> Result<Option<Relay>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, story_id, user_id, content, like_count, created_at, updated_at
            FROM relays
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Relay::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Update a relay's content
    pub async fn update_relay(&self, id: i64, content: &str) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE relays
            SET content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(content)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a relay
    pub async fn delete_relay(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM relays WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewStory, NewUser, Role};
    use crate::repository::test_db;

    async fn seed_story(db: &Database) -> (i64, i64) {
        let uid = db
            .insert_user(NewUser {
                nickname: "teller".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                role: Role::Standard,
            })
            .await
            .unwrap()
            .id;
        let sid = db
            .insert_story(NewStory {
                user_id: uid,
                title: "campfire tale".to_string(),
                content: "It was a dark night".to_string(),
            })
            .await
            .unwrap()
            .id;
        (uid, sid)
    }

    #[tokio::test]
    async fn relays_listed_in_append_order() {
        let db = test_db().await;
        let (uid, sid) = seed_story(&db).await;

        for part in ["and then", "suddenly", "the end"] {
            db.insert_relay(NewRelay {
                story_id: sid,
                user_id: uid,
                content: part.to_string(),
            })
            .await
            .unwrap();
        }

        let relays = db.list_relays(sid).await.unwrap();
        assert_eq!(relays.len(), 3);
        assert_eq!(relays[0].content, "and then");
        assert_eq!(relays[2].content, "the end");
    }

    #[tokio::test]
    async fn update_and_delete_relay() {
        let db = test_db().await;
        let (uid, sid) = seed_story(&db).await;
        let relay = db
            .insert_relay(NewRelay {
                story_id: sid,
                user_id: uid,
                content: "draft".to_string(),
            })
            .await
            .unwrap();

        assert!(db.update_relay(relay.id, "revised").await.unwrap());
        let fetched = db.get_relay_by_id(relay.id).await.unwrap().unwrap();
        assert_eq!(fetched.content, "revised");

        assert!(db.delete_relay(relay.id).await.unwrap());
        assert!(db.get_relay_by_id(relay.id).await.unwrap().is_none());
        assert!(!db.delete_relay(relay.id).await.unwrap());
    }
}
