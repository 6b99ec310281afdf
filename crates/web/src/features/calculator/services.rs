use sqlx::PgPool;
use storage::{
    dto::{
        calculator::CalculationResponse,
        common::{PaginatedResponse, PaginationParams},
    },
    error::Result,
    models::{BodyProfile, UserProfile},
    repository::{calculation::CalculationRepository, profile::ProfileRepository},
    services::calculation_history,
};
use uuid::Uuid;

/// Persist the profile, run the calculator and store the result
pub async fn calculate(
    pool: &PgPool,
    user_id: Uuid,
    profile: &BodyProfile,
) -> Result<CalculationResponse> {
    let calculation = calculation_history::compute_and_store(pool, user_id, profile).await?;
    Ok(CalculationResponse::from(calculation))
}

/// Recalculate from the user's stored profile
pub async fn recalculate(pool: &PgPool, user_id: Uuid) -> Result<CalculationResponse> {
    let calculation = calculation_history::recompute_from_profile(pool, user_id).await?;
    Ok(CalculationResponse::from(calculation))
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile> {
    let repo = ProfileRepository::new(pool);
    repo.find_by_user(user_id).await
}

/// Get the user's calculation history, newest first
pub async fn list_history(
    pool: &PgPool,
    user_id: Uuid,
    params: PaginationParams,
) -> Result<PaginatedResponse<CalculationResponse>> {
    let repo = CalculationRepository::new(pool);

    let total_items = repo.count_for_user(user_id).await?;
    let calculations = repo
        .list_for_user(user_id, params.limit(), params.offset())
        .await?;

    let data = calculations
        .into_iter()
        .map(CalculationResponse::from)
        .collect();

    Ok(PaginatedResponse::new(data, params, total_items))
}

pub async fn get_calculation(
    pool: &PgPool,
    user_id: Uuid,
    calculation_id: Uuid,
) -> Result<CalculationResponse> {
    let repo = CalculationRepository::new(pool);
    let calculation = repo.find_for_user(user_id, calculation_id).await?;
    Ok(CalculationResponse::from(calculation))
}

pub async fn delete_calculation(pool: &PgPool, user_id: Uuid, calculation_id: Uuid) -> Result<()> {
    let repo = CalculationRepository::new(pool);
    repo.delete_for_user(user_id, calculation_id).await?;

    tracing::info!(%user_id, %calculation_id, "Deleted calorie calculation");

    Ok(())
}
