use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{BodyProfile, CalorieCalculation};
use crate::services::calorie_engine::CalculationResult;

const CALCULATION_COLUMNS: &str = r#"
    calculation_id, user_id,
    age, gender, weight_kg, height_cm, activity_level, body_fat_percent, goal,
    bmr, maintenance_calories, weight_loss_calories, weight_gain_calories,
    bmi, bmi_category, ideal_weight_min, ideal_weight_max,
    calculated_at
"#;

pub struct CalculationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CalculationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Appends a calculation to the user's history.
    pub async fn insert(
        &self,
        user_id: Uuid,
        profile: &BodyProfile,
        result: &CalculationResult,
    ) -> Result<CalorieCalculation> {
        let age = i32::try_from(profile.age)
            .map_err(|_| StorageError::ConstraintViolation("age out of range".to_string()))?;

        let query = format!(
            r#"
            INSERT INTO calorie_calculations (
                calculation_id, user_id,
                age, gender, weight_kg, height_cm, activity_level, body_fat_percent, goal,
                bmr, maintenance_calories, weight_loss_calories, weight_gain_calories,
                bmi, bmi_category, ideal_weight_min, ideal_weight_max
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {CALCULATION_COLUMNS}
            "#
        );

        let calculation = sqlx::query_as::<_, CalorieCalculation>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(age)
            .bind(profile.gender.as_str())
            .bind(profile.weight_kg)
            .bind(profile.height_cm)
            .bind(profile.activity_level.as_str())
            .bind(profile.body_fat_percent)
            .bind(profile.goal.as_str())
            .bind(result.bmr)
            .bind(result.maintenance_calories)
            .bind(result.weight_loss_calories)
            .bind(result.weight_gain_calories)
            .bind(result.bmi)
            .bind(result.bmi_category.label())
            .bind(result.ideal_weight_min)
            .bind(result.ideal_weight_max)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                StorageError::from(e).or_constraint("a profile must exist before storing a calculation")
            })?;

        Ok(calculation)
    }

    /// Fetches one calculation, scoped to its owner.
    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        calculation_id: Uuid,
    ) -> Result<CalorieCalculation> {
        let query = format!(
            r#"
            SELECT {CALCULATION_COLUMNS}
            FROM calorie_calculations
            WHERE calculation_id = $1 AND user_id = $2
            "#
        );

        let calculation = sqlx::query_as::<_, CalorieCalculation>(&query)
            .bind(calculation_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(calculation)
    }

    /// Newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CalorieCalculation>> {
        let query = format!(
            r#"
            SELECT {CALCULATION_COLUMNS}
            FROM calorie_calculations
            WHERE user_id = $1
            ORDER BY calculated_at DESC, calculation_id
            LIMIT $2 OFFSET $3
            "#
        );

        let calculations = sqlx::query_as::<_, CalorieCalculation>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        Ok(calculations)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM calorie_calculations WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count)
    }

    pub async fn delete_for_user(&self, user_id: Uuid, calculation_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM calorie_calculations
            WHERE calculation_id = $1 AND user_id = $2
            "#,
        )
        .bind(calculation_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
