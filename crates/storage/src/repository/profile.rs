use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{BodyProfile, UserProfile};

pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, age, gender, weight_kg, height_cm, activity_level,
                   body_fat_percent, goal, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(profile)
    }

    /// Inserts the user's profile or replaces the existing one in place.
    pub async fn upsert(&self, user_id: Uuid, profile: &BodyProfile) -> Result<UserProfile> {
        let age = i32::try_from(profile.age)
            .map_err(|_| StorageError::ConstraintViolation("age out of range".to_string()))?;

        let stored = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles
                (user_id, age, gender, weight_kg, height_cm, activity_level, body_fat_percent, goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id)
            DO UPDATE SET
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                activity_level = EXCLUDED.activity_level,
                body_fat_percent = EXCLUDED.body_fat_percent,
                goal = EXCLUDED.goal,
                updated_at = CURRENT_TIMESTAMP
            RETURNING user_id, age, gender, weight_kg, height_cm, activity_level,
                      body_fat_percent, goal, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(age)
        .bind(profile.gender.as_str())
        .bind(profile.weight_kg)
        .bind(profile.height_cm)
        .bind(profile.activity_level.as_str())
        .bind(profile.body_fat_percent)
        .bind(profile.goal.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(stored)
    }
}
