//! Story operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewStory, Story, StorySummary, StoryUpdate};
use crate::repository::Database;

impl Database {
    // ==================== Story Operations ====================

    /// Insert a new story
    pub async fn insert_story(&self, story: NewStory) -> Result<Story, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO stories (user_id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(story.user_id)
        .bind(&story.title)
        .bind(&story.content)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Story {
            id,
            user_id: story.user_id,
            title: story.title,
            content: story.content,
            is_finished: false,
            like_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// List all stories with their author's nickname, newest first
    pub async fn list_stories(&self) -> Result<Vec<StorySummary>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, u.nickname, s.title, s.content, s.is_finished,
                   s.like_count, s.created_at, s.updated_at
            FROM stories s
            JOIN users u ON u.id = s.user_id
            ORDER BY s.created_at DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| StorySummary::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Get a story by ID
    pub async fn get_story_by_id(&self, id: i64) -> Result<Option<Story>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, user_id, title, content, is_finished, like_count,
                   created_at, updated_at
            FROM stories
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Story::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get a story by ID together with its author's nickname
    pub async fn get_story_summary(&self, id: i64) -> Result<Option<StorySummary>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT s.id, u.nickname, s.title, s.content, s.is_finished,
                   s.like_count, s.created_at, s.updated_at
            FROM stories s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| StorySummary::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Update a story's title, content, or finished flag
    pub async fn update_story(&self, id: i64, update: StoryUpdate) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE stories
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                is_finished = COALESCE(?, is_finished),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(update.title)
        .bind(update.content)
        .bind(update.is_finished)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a story (its relays and likes go with it)
    pub async fn delete_story(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, Role};
    use crate::repository::test_db;

    async fn seed_user(db: &Database, nickname: &str) -> i64 {
        db.insert_user(NewUser {
            nickname: nickname.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role: Role::Standard,
        })
        .await
        .unwrap()
        .id
    }

    fn sample_story(user_id: i64, title: &str) -> NewStory {
        NewStory {
            user_id,
            title: title.to_string(),
            content: "Once upon a time".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_list_stories() {
        let db = test_db().await;
        let uid = seed_user(&db, "author1").await;

        db.insert_story(sample_story(uid, "first")).await.unwrap();
        db.insert_story(sample_story(uid, "second")).await.unwrap();

        let stories = db.list_stories().await.unwrap();
        assert_eq!(stories.len(), 2);
        // Newest first
        assert_eq!(stories[0].title, "second");
        assert_eq!(stories[0].nickname, "author1");
    }

    #[tokio::test]
    async fn update_story_fields() {
        let db = test_db().await;
        let uid = seed_user(&db, "author2").await;
        let story = db.insert_story(sample_story(uid, "draft")).await.unwrap();

        let changed = db
            .update_story(
                story.id,
                StoryUpdate {
                    title: Some("final".to_string()),
                    content: None,
                    is_finished: Some(true),
                },
            )
            .await
            .unwrap();
        assert!(changed);

        let updated = db.get_story_by_id(story.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "final");
        assert_eq!(updated.content, "Once upon a time");
        assert!(updated.is_finished);
    }

    #[tokio::test]
    async fn update_missing_story_is_noop() {
        let db = test_db().await;
        let changed = db
            .update_story(999, StoryUpdate::default())
            .await
            .unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    async fn delete_story_cascades_relays() {
        let db = test_db().await;
        let uid = seed_user(&db, "author3").await;
        let story = db.insert_story(sample_story(uid, "doomed")).await.unwrap();
        db.insert_relay(crate::models::NewRelay {
            story_id: story.id,
            user_id: uid,
            content: "and then".to_string(),
        })
        .await
        .unwrap();

        assert!(db.delete_story(story.id).await.unwrap());
        assert!(db.get_story_by_id(story.id).await.unwrap().is_none());
        assert!(db.list_relays(story.id).await.unwrap().is_empty());
    }
}
