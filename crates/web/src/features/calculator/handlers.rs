use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        calculator::{CalculateRequest, CalculationResponse, MacroQuery},
        common::{PaginatedResponse, PaginationParams},
    },
    models::{BodyProfile, Goal, UserProfile},
    services::calorie_engine::{self, CalculationResult, MacroBreakdown},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthenticatedUser;

use super::services;

fn body_profile(req: &CalculateRequest) -> Result<BodyProfile, WebError> {
    req.validate()?;
    req.body_profile()
        .ok_or_else(|| WebError::BadRequest("gender must be male or female".to_string()))
}

#[utoipa::path(
    post,
    path = "/api/calculator/calculate",
    request_body = CalculateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Calculation stored", body = CalculationResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "calculator"
)]
pub async fn calculate(
    State(db): State<Database>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(req): Json<CalculateRequest>,
) -> Result<Response, WebError> {
    let profile = body_profile(&req)?;

    let response = services::calculate(db.pool(), user_id, &profile).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/calculator/recalculate",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Calculation stored from the saved profile", body = CalculationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No saved profile")
    ),
    tag = "calculator"
)]
pub async fn recalculate(
    State(db): State<Database>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Response, WebError> {
    let response = services::recalculate(db.pool(), user_id).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/calculator/preview",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Calculation result, not stored", body = CalculationResult),
        (status = 400, description = "Validation error")
    ),
    tag = "calculator"
)]
pub async fn preview(Json(req): Json<CalculateRequest>) -> Result<Response, WebError> {
    let profile = body_profile(&req)?;

    Ok(Json(calorie_engine::calculate(&profile)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/calculator/macros",
    params(MacroQuery),
    responses(
        (status = 200, description = "Macronutrient split for the given calories", body = MacroBreakdown),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "calculator"
)]
pub async fn macros(Query(query): Query<MacroQuery>) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let breakdown = calorie_engine::macro_breakdown(
        query.maintenance_calories,
        Goal::from_label(query.goal.as_deref()),
    );

    Ok(Json(breakdown).into_response())
}

#[utoipa::path(
    get,
    path = "/api/calculator/profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's saved profile", body = UserProfile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No saved profile")
    ),
    tag = "calculator"
)]
pub async fn get_profile(
    State(db): State<Database>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Response, WebError> {
    let profile = services::get_profile(db.pool(), user_id).await?;

    Ok(Json(profile).into_response())
}

#[utoipa::path(
    get,
    path = "/api/calculator/history",
    params(PaginationParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's calculations, newest first", body = PaginatedResponse<CalculationResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "calculator"
)]
pub async fn list_history(
    State(db): State<Database>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate().map_err(WebError::BadRequest)?;

    let response = services::list_history(db.pool(), user_id, params).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/calculator/history/{calculation_id}",
    params(
        ("calculation_id" = Uuid, Path, description = "Calculation ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Calculation found", body = CalculationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Calculation not found")
    ),
    tag = "calculator"
)]
pub async fn get_calculation(
    State(db): State<Database>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(calculation_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let response = services::get_calculation(db.pool(), user_id, calculation_id).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/calculator/history/{calculation_id}",
    params(
        ("calculation_id" = Uuid, Path, description = "Calculation ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Calculation deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Calculation not found")
    ),
    tag = "calculator"
)]
pub async fn delete_calculation(
    State(db): State<Database>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(calculation_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_calculation(db.pool(), user_id, calculation_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
