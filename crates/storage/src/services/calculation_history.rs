use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{BodyProfile, CalorieCalculation};
use crate::repository::calculation::CalculationRepository;
use crate::repository::profile::ProfileRepository;
use crate::services::calorie_engine;

/// Saves `profile` as the user's active profile, runs the engine and appends
/// the result to the user's history.
pub async fn compute_and_store(
    pool: &PgPool,
    user_id: Uuid,
    profile: &BodyProfile,
) -> Result<CalorieCalculation> {
    ProfileRepository::new(pool).upsert(user_id, profile).await?;

    let result = calorie_engine::calculate(profile);
    let calculation = CalculationRepository::new(pool)
        .insert(user_id, profile, &result)
        .await?;

    tracing::info!(
        %user_id,
        calculation_id = %calculation.calculation_id,
        maintenance_calories = %calculation.maintenance_calories,
        "Stored calorie calculation"
    );

    Ok(calculation)
}

/// Runs the engine again on the user's stored profile.
pub async fn recompute_from_profile(pool: &PgPool, user_id: Uuid) -> Result<CalorieCalculation> {
    let stored = ProfileRepository::new(pool).find_by_user(user_id).await?;

    let profile = stored.body_profile().ok_or_else(|| {
        StorageError::ConstraintViolation("stored profile can no longer be interpreted".to_string())
    })?;

    compute_and_store(pool, user_id, &profile).await
}
