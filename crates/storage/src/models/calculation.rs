use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One stored calorie calculation.
///
/// Rows are append-only: a new calculation never overwrites an older one, so the
/// table doubles as the user's history. The profile inputs are snapshotted next
/// to the outputs because the active profile is replaced in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CalorieCalculation {
    pub calculation_id: Uuid,
    pub user_id: Uuid,

    pub age: i32,
    pub gender: String,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub activity_level: String,
    pub body_fat_percent: Option<Decimal>,
    pub goal: String,

    pub bmr: Decimal,
    pub maintenance_calories: Decimal,
    pub weight_loss_calories: Decimal,
    pub weight_gain_calories: Decimal,
    pub bmi: Decimal,
    pub bmi_category: String,
    pub ideal_weight_min: Decimal,
    pub ideal_weight_max: Decimal,

    pub calculated_at: NaiveDateTime,
}
