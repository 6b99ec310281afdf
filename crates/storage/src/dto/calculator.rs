use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{ActivityLevel, BodyProfile, CalorieCalculation, Gender, Goal};
use crate::services::calorie_engine::{self, MacroBreakdown};

/// Request payload carrying the body profile to calculate for.
///
/// `activity_level` and `goal` are free-form: unknown or missing values fall
/// back to `sedentary` and `maintain`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CalculateRequest {
    #[validate(range(min = 15, max = 100, message = "Age must be between 15 and 100"))]
    pub age: u32,

    #[validate(custom(function = "validate_gender"))]
    pub gender: String,

    #[validate(custom(function = "validate_weight"))]
    pub weight_kg: Decimal,

    #[validate(custom(function = "validate_height"))]
    pub height_cm: Decimal,

    pub activity_level: Option<String>,

    #[validate(custom(function = "validate_body_fat"))]
    pub body_fat_percent: Option<Decimal>,

    pub goal: Option<String>,
}

/// Decimal places kept for body measurements, matching their `NUMERIC(_, 2)` columns.
const MEASUREMENT_DECIMAL_PLACES: u32 = 2;

impl CalculateRequest {
    /// Engine input for this request; `None` only when the gender is invalid,
    /// which validation already rejects.
    ///
    /// Measurements are rounded to the precision they are stored with, so a
    /// stored profile recalculates to the same figures.
    pub fn body_profile(&self) -> Option<BodyProfile> {
        Some(BodyProfile {
            age: self.age,
            gender: Gender::from_label(&self.gender)?,
            weight_kg: stored_precision(self.weight_kg),
            height_cm: stored_precision(self.height_cm),
            activity_level: ActivityLevel::from_label(self.activity_level.as_deref()),
            body_fat_percent: self.body_fat_percent.map(stored_precision),
            goal: Goal::from_label(self.goal.as_deref()),
        })
    }
}

// PostgreSQL rounds NUMERIC half away from zero.
fn stored_precision(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        MEASUREMENT_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    if Gender::from_label(gender).is_some() {
        Ok(())
    } else {
        Err(range_error("invalid_gender", "Gender must be male or female"))
    }
}

fn validate_weight(weight_kg: &Decimal) -> Result<(), ValidationError> {
    check_range(*weight_kg, 30, 300, "Weight must be between 30 and 300 kg")
}

fn validate_height(height_cm: &Decimal) -> Result<(), ValidationError> {
    check_range(*height_cm, 100, 250, "Height must be between 100 and 250 cm")
}

fn validate_body_fat(body_fat_percent: &Decimal) -> Result<(), ValidationError> {
    check_range(*body_fat_percent, 5, 50, "Body fat must be between 5 and 50 percent")
}

fn check_range(
    value: Decimal,
    min: i64,
    max: i64,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value >= Decimal::from(min) && value <= Decimal::from(max) {
        Ok(())
    } else {
        Err(range_error("range", message))
    }
}

fn range_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// A stored calculation with its macros re-derived from the maintenance figure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculationResponse {
    pub calculation_id: Uuid,
    pub profile: ProfileSnapshot,
    pub bmr: Decimal,
    pub maintenance_calories: Decimal,
    pub weight_loss_calories: Decimal,
    pub weight_gain_calories: Decimal,
    pub bmi: Decimal,
    pub bmi_category: String,
    pub ideal_weight_min: Decimal,
    pub ideal_weight_max: Decimal,
    pub macros: MacroBreakdown,
    pub calculated_at: NaiveDateTime,
}

/// Profile inputs as they were when the calculation ran.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileSnapshot {
    pub age: i32,
    pub gender: String,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub activity_level: String,
    pub body_fat_percent: Option<Decimal>,
    pub goal: String,
}

impl From<CalorieCalculation> for CalculationResponse {
    fn from(calc: CalorieCalculation) -> Self {
        let macros = calorie_engine::macro_breakdown(
            calc.maintenance_calories,
            Goal::from_label(Some(&calc.goal)),
        );

        Self {
            calculation_id: calc.calculation_id,
            profile: ProfileSnapshot {
                age: calc.age,
                gender: calc.gender,
                weight_kg: calc.weight_kg,
                height_cm: calc.height_cm,
                activity_level: calc.activity_level,
                body_fat_percent: calc.body_fat_percent,
                goal: calc.goal,
            },
            bmr: calc.bmr,
            maintenance_calories: calc.maintenance_calories,
            weight_loss_calories: calc.weight_loss_calories,
            weight_gain_calories: calc.weight_gain_calories,
            bmi: calc.bmi,
            bmi_category: calc.bmi_category,
            ideal_weight_min: calc.ideal_weight_min,
            ideal_weight_max: calc.ideal_weight_max,
            macros,
            calculated_at: calc.calculated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct MacroQuery {
    pub maintenance_calories: Decimal,
    pub goal: Option<String>,
}

/// Upper bound accepted by the macros endpoint, in kcal/day.
pub const MAX_MAINTENANCE_CALORIES: i64 = 20_000;

impl MacroQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.maintenance_calories <= Decimal::ZERO {
            return Err("maintenance_calories must be positive".to_string());
        }
        if self.maintenance_calories > Decimal::from(MAX_MAINTENANCE_CALORIES) {
            return Err(format!(
                "maintenance_calories must be at most {}",
                MAX_MAINTENANCE_CALORIES
            ));
        }
        Ok(())
    }
}
