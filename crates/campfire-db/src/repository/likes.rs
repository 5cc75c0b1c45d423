//! Like toggle operations
//!
//! A like is a unique (user, target) row; the target's denormalized
//! `like_count` moves with that row inside one transaction.

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::repository::Database;

impl Database {
    // ==================== Like Operations ====================

    /// Toggle a user's like on a story. Returns true if the story is now
    /// liked by the user, false if the like was removed.
    pub async fn toggle_story_like(&self, user_id: i64, story_id: i64) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(
            "SELECT COUNT(*) as count FROM story_likes WHERE user_id = ? AND story_id = ?",
        )
        .bind(user_id)
        .bind(story_id)
        .fetch_one(&mut *tx)
        .await?;
        let liked: i64 = existing.get("count");

        let now_liked = if liked > 0 {
            sqlx::query("DELETE FROM story_likes WHERE user_id = ? AND story_id = ?")
                .bind(user_id)
                .bind(story_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE stories SET like_count = like_count - 1 WHERE id = ?")
                .bind(story_id)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            sqlx::query("INSERT INTO story_likes (user_id, story_id, created_at) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(story_id)
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE stories SET like_count = like_count + 1 WHERE id = ?")
                .bind(story_id)
                .execute(&mut *tx)
                .await?;
            true
        };

        tx.commit().await?;
        Ok(now_liked)
    }

    /// Toggle a user's like on a relay. Returns true if the relay is now
    /// liked by the user, false if the like was removed.
    pub async fn toggle_relay_like(&self, user_id: i64, relay_id: i64) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query(
            "SELECT COUNT(*) as count FROM relay_likes WHERE user_id = ? AND relay_id = ?",
        )
        .bind(user_id)
        .bind(relay_id)
        .fetch_one(&mut *tx)
        .await?;
        let liked: i64 = existing.get("count");

        let now_liked = if liked > 0 {
            sqlx::query("DELETE FROM relay_likes WHERE user_id = ? AND relay_id = ?")
                .bind(user_id)
                .bind(relay_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE relays SET like_count = like_count - 1 WHERE id = ?")
                .bind(relay_id)
                .execute(&mut *tx)
                .await?;
            false
        } else {
            sqlx::query("INSERT INTO relay_likes (user_id, relay_id, created_at) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(relay_id)
                .bind(Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE relays SET like_count = like_count + 1 WHERE id = ?")
                .bind(relay_id)
                .execute(&mut *tx)
                .await?;
            true
        };

        tx.commit().await?;
        Ok(now_liked)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{NewRelay, NewStory, NewUser, Role};
    use crate::repository::{test_db, Database};

    async fn seed(db: &Database) -> (i64, i64, i64) {
        let uid = db
            .insert_user(NewUser {
                nickname: "liker1".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                role: Role::Standard,
            })
            .await
            .unwrap()
            .id;
        let sid = db
            .insert_story(NewStory {
                user_id: uid,
                title: "popular".to_string(),
                content: "story".to_string(),
            })
            .await
            .unwrap()
            .id;
        let rid = db
            .insert_relay(NewRelay {
                story_id: sid,
                user_id: uid,
                content: "part two".to_string(),
            })
            .await
            .unwrap()
            .id;
        (uid, sid, rid)
    }

    #[tokio::test]
    async fn story_like_toggles_symmetrically() {
        let db = test_db().await;
        let (uid, sid, _) = seed(&db).await;

        assert!(db.toggle_story_like(uid, sid).await.unwrap());
        assert_eq!(db.get_story_by_id(sid).await.unwrap().unwrap().like_count, 1);

        // Liking again removes the like
        assert!(!db.toggle_story_like(uid, sid).await.unwrap());
        assert_eq!(db.get_story_by_id(sid).await.unwrap().unwrap().like_count, 0);
    }

    #[tokio::test]
    async fn relay_like_toggles_symmetrically() {
        let db = test_db().await;
        let (uid, _, rid) = seed(&db).await;

        assert!(db.toggle_relay_like(uid, rid).await.unwrap());
        assert_eq!(db.get_relay_by_id(rid).await.unwrap().unwrap().like_count, 1);

        assert!(!db.toggle_relay_like(uid, rid).await.unwrap());
        assert_eq!(db.get_relay_by_id(rid).await.unwrap().unwrap().like_count, 0);
    }

    #[tokio::test]
    async fn likes_are_per_user() {
        let db = test_db().await;
        let (uid, sid, _) = seed(&db).await;
        let other = db
            .insert_user(NewUser {
                nickname: "liker2".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                role: Role::Standard,
            })
            .await
            .unwrap()
            .id;

        db.toggle_story_like(uid, sid).await.unwrap();
        db.toggle_story_like(other, sid).await.unwrap();
        assert_eq!(db.get_story_by_id(sid).await.unwrap().unwrap().like_count, 2);

        db.toggle_story_like(uid, sid).await.unwrap();
        assert_eq!(db.get_story_by_id(sid).await.unwrap().unwrap().like_count, 1);
    }
}
