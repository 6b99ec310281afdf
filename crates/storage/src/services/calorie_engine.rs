//! Calorie and macronutrient calculator.
//!
//! Pure functions over [`BodyProfile`]. All arithmetic is exact decimal
//! arithmetic; rounding happens once, on the final value, using banker's
//! rounding (round half to even).
//!
//! BMR uses Katch-McArdle when a body fat percentage is known and
//! Mifflin-St Jeor otherwise:
//!
//! - Katch-McArdle: `370 + 21.6 × lean_mass_kg`
//! - Mifflin-St Jeor: `10 × kg + 6.25 × cm − 5 × age`, then `+5` (male) or `−161` (female)

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{ActivityLevel, BodyProfile, Gender, Goal};

/// Daily calorie offset used for the weight-loss and weight-gain targets.
const CALORIE_ADJUSTMENT: i64 = 500;

const PROTEIN_KCAL_PER_GRAM: i64 = 4;
const CARBS_KCAL_PER_GRAM: i64 = 4;
const FAT_KCAL_PER_GRAM: i64 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::NormalWeight => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MacroNutrient {
    pub grams: Decimal,
    pub calories: Decimal,
    /// Whole percent of the daily calories, e.g. `30`.
    pub percentage: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MacroBreakdown {
    pub protein: MacroNutrient,
    pub carbs: MacroNutrient,
    pub fat: MacroNutrient,
}

/// Share of daily calories per macronutrient, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroSplit {
    pub protein: u8,
    pub fat: u8,
    pub carbs: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalculationResult {
    pub bmr: Decimal,
    pub maintenance_calories: Decimal,
    pub weight_loss_calories: Decimal,
    pub weight_gain_calories: Decimal,
    pub bmi: Decimal,
    pub bmi_category: BmiCategory,
    pub ideal_weight_min: Decimal,
    pub ideal_weight_max: Decimal,
    pub macros: MacroBreakdown,
}

/// Runs the full calculation for one profile.
pub fn calculate(profile: &BodyProfile) -> CalculationResult {
    let bmr = basal_metabolic_rate(profile);
    let maintenance = bmr * activity_multiplier(profile.activity_level);
    let weight_loss = (maintenance - Decimal::from(CALORIE_ADJUSTMENT)).max(bmr);

    let bmr = round(bmr, 0);
    let maintenance_calories = round(maintenance, 0);
    let weight_loss_calories = round(weight_loss, 0);
    let weight_gain_calories = maintenance_calories + Decimal::from(CALORIE_ADJUSTMENT);

    let bmi = round(body_mass_index(profile.weight_kg, profile.height_cm), 1);
    let (ideal_weight_min, ideal_weight_max) = ideal_weight_range(profile.height_cm);

    CalculationResult {
        bmr,
        maintenance_calories,
        weight_loss_calories,
        weight_gain_calories,
        bmi,
        bmi_category: bmi_category(bmi),
        ideal_weight_min,
        ideal_weight_max,
        macros: macro_breakdown(maintenance_calories, profile.goal),
    }
}

/// Unrounded BMR in kcal/day.
pub fn basal_metabolic_rate(profile: &BodyProfile) -> Decimal {
    match profile.body_fat_percent {
        Some(body_fat) => {
            let lean_mass = profile.weight_kg * (Decimal::ONE - body_fat / Decimal::ONE_HUNDRED);
            Decimal::from(370) + Decimal::new(216, 1) * lean_mass
        }
        None => {
            let base = Decimal::TEN * profile.weight_kg + Decimal::new(625, 2) * profile.height_cm
                - Decimal::from(5) * Decimal::from(profile.age);
            match profile.gender {
                Gender::Male => base + Decimal::from(5),
                Gender::Female => base - Decimal::from(161),
            }
        }
    }
}

pub fn activity_multiplier(level: ActivityLevel) -> Decimal {
    match level {
        ActivityLevel::Sedentary => Decimal::new(12, 1),
        ActivityLevel::Light => Decimal::new(1375, 3),
        ActivityLevel::Moderate => Decimal::new(155, 2),
        ActivityLevel::Active => Decimal::new(1725, 3),
        ActivityLevel::VeryActive => Decimal::new(19, 1),
    }
}

/// Unrounded BMI. `height_cm` must be non-zero.
pub fn body_mass_index(weight_kg: Decimal, height_cm: Decimal) -> Decimal {
    let height_m = height_cm / Decimal::ONE_HUNDRED;
    weight_kg / (height_m * height_m)
}

/// Lower bounds are inclusive: 18.5 is normal weight, 25 overweight, 30 obese.
pub fn bmi_category(bmi: Decimal) -> BmiCategory {
    if bmi < Decimal::new(185, 1) {
        BmiCategory::Underweight
    } else if bmi < Decimal::from(25) {
        BmiCategory::NormalWeight
    } else if bmi < Decimal::from(30) {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Weight range (kg, one decimal) that keeps BMI between 18.5 and 24.9.
pub fn ideal_weight_range(height_cm: Decimal) -> (Decimal, Decimal) {
    let height_m = height_cm / Decimal::ONE_HUNDRED;
    let height_sq = height_m * height_m;

    (
        round(Decimal::new(185, 1) * height_sq, 1),
        round(Decimal::new(249, 1) * height_sq, 1),
    )
}

pub fn macro_split(goal: Goal) -> MacroSplit {
    match goal {
        Goal::Lose => MacroSplit {
            protein: 30,
            fat: 25,
            carbs: 45,
        },
        Goal::Gain => MacroSplit {
            protein: 25,
            fat: 25,
            carbs: 50,
        },
        Goal::Maintain => MacroSplit {
            protein: 25,
            fat: 30,
            carbs: 45,
        },
    }
}

/// Splits `maintenance_calories` across protein, carbs and fat for `goal`.
///
/// Also used to re-derive the breakdown of stored calculations, which only
/// keep the maintenance figure and the goal.
pub fn macro_breakdown(maintenance_calories: Decimal, goal: Goal) -> MacroBreakdown {
    let split = macro_split(goal);

    MacroBreakdown {
        protein: macro_nutrient(maintenance_calories, split.protein, PROTEIN_KCAL_PER_GRAM),
        carbs: macro_nutrient(maintenance_calories, split.carbs, CARBS_KCAL_PER_GRAM),
        fat: macro_nutrient(maintenance_calories, split.fat, FAT_KCAL_PER_GRAM),
    }
}

/// `share` is at most one, so the product never exceeds `total_calories` and
/// cannot overflow.
fn macro_nutrient(total_calories: Decimal, percentage: u8, kcal_per_gram: i64) -> MacroNutrient {
    let share = Decimal::from(percentage) / Decimal::ONE_HUNDRED;
    let calories = total_calories * share;
    let grams = calories / Decimal::from(kcal_per_gram);

    MacroNutrient {
        grams: round(grams, 0),
        calories: round(calories, 0),
        percentage,
    }
}

fn round(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn reference_profile() -> BodyProfile {
        BodyProfile {
            age: 30,
            gender: Gender::Male,
            weight_kg: dec("80"),
            height_cm: dec("180"),
            activity_level: ActivityLevel::Moderate,
            body_fat_percent: None,
            goal: Goal::Maintain,
        }
    }

    #[test]
    fn test_mifflin_st_jeor_reference_male() {
        let result = calculate(&reference_profile());

        assert_eq!(result.bmr, dec("1780"));
        assert_eq!(result.maintenance_calories, dec("2759"));
        assert_eq!(result.weight_loss_calories, dec("2259"));
        assert_eq!(result.weight_gain_calories, dec("3259"));
        assert_eq!(result.bmi, dec("24.7"));
        assert_eq!(result.bmi_category, BmiCategory::NormalWeight);
        assert_eq!(result.ideal_weight_min, dec("59.9"));
        assert_eq!(result.ideal_weight_max, dec("80.7"));
    }

    #[test]
    fn test_mifflin_st_jeor_female_offset() {
        let profile = BodyProfile {
            gender: Gender::Female,
            ..reference_profile()
        };

        // 800 + 1125 - 150 - 161
        assert_eq!(calculate(&profile).bmr, dec("1614"));
    }

    #[test]
    fn test_katch_mcardle_ignores_age_and_gender() {
        let male = BodyProfile {
            body_fat_percent: Some(dec("20")),
            ..reference_profile()
        };
        let female = BodyProfile {
            age: 64,
            gender: Gender::Female,
            ..male.clone()
        };

        assert_eq!(basal_metabolic_rate(&male), dec("1752.4"));
        assert_eq!(calculate(&male).bmr, dec("1752"));
        assert_eq!(calculate(&female).bmr, dec("1752"));
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        // 800 + 1127.5 - 150 + 5 = 1782.5
        let profile = BodyProfile {
            height_cm: dec("180.4"),
            activity_level: ActivityLevel::Sedentary,
            ..reference_profile()
        };

        assert_eq!(basal_metabolic_rate(&profile), dec("1782.5"));
        assert_eq!(calculate(&profile).bmr, dec("1782"));
    }

    #[test]
    fn test_activity_multipliers() {
        let cases = [
            (ActivityLevel::Sedentary, "2136"),
            (ActivityLevel::Light, "2448"),
            (ActivityLevel::Moderate, "2759"),
            (ActivityLevel::Active, "3070"),
            (ActivityLevel::VeryActive, "3382"),
        ];

        for (level, expected) in cases {
            let profile = BodyProfile {
                activity_level: level,
                ..reference_profile()
            };
            assert_eq!(
                calculate(&profile).maintenance_calories,
                dec(expected),
                "activity level {:?}",
                level
            );
        }
    }

    #[test]
    fn test_unknown_activity_label_uses_sedentary_multiplier() {
        let profile = BodyProfile {
            activity_level: ActivityLevel::from_label(Some("marathon-every-day")),
            ..reference_profile()
        };

        assert_eq!(calculate(&profile).maintenance_calories, dec("2136"));
    }

    #[test]
    fn test_weight_loss_target_is_floored_at_bmr() {
        // Sedentary: 1780 * 1.2 = 2136, and 2136 - 500 is below the BMR.
        let profile = BodyProfile {
            activity_level: ActivityLevel::Sedentary,
            ..reference_profile()
        };
        let result = calculate(&profile);

        assert_eq!(result.weight_loss_calories, result.bmr);
        assert!(result.weight_loss_calories >= result.bmr);
    }

    #[test]
    fn test_gain_is_maintenance_plus_500() {
        for level in [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ] {
            let result = calculate(&BodyProfile {
                activity_level: level,
                body_fat_percent: Some(dec("17.5")),
                ..reference_profile()
            });
            assert_eq!(
                result.weight_gain_calories - result.maintenance_calories,
                dec("500")
            );
        }
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(bmi_category(dec("18.49")), BmiCategory::Underweight);
        assert_eq!(bmi_category(dec("18.5")), BmiCategory::NormalWeight);
        assert_eq!(bmi_category(dec("24.99")), BmiCategory::NormalWeight);
        assert_eq!(bmi_category(dec("25.0")), BmiCategory::Overweight);
        assert_eq!(bmi_category(dec("29.99")), BmiCategory::Overweight);
        assert_eq!(bmi_category(dec("30.0")), BmiCategory::Obese);
    }

    #[test]
    fn test_bmi_category_follows_displayed_bmi() {
        // 73.84 / 2.0^2 = 18.46, shown as 18.5
        let near_underweight = calculate(&BodyProfile {
            weight_kg: dec("73.84"),
            height_cm: dec("200"),
            ..reference_profile()
        });
        assert_eq!(near_underweight.bmi, dec("18.5"));
        assert_eq!(near_underweight.bmi_category, BmiCategory::NormalWeight);

        // 99.84 / 2.0^2 = 24.96, shown as 25.0
        let near_overweight = calculate(&BodyProfile {
            weight_kg: dec("99.84"),
            height_cm: dec("200"),
            ..reference_profile()
        });
        assert_eq!(near_overweight.bmi, dec("25.0"));
        assert_eq!(near_overweight.bmi_category, BmiCategory::Overweight);
    }

    #[test]
    fn test_bmi_category_serializes_as_label() {
        let json = serde_json::to_string(&BmiCategory::NormalWeight).unwrap();
        assert_eq!(json, "\"Normal weight\"");
        assert_eq!(BmiCategory::Obese.to_string(), "Obese");
    }

    #[test]
    fn test_ideal_weight_range() {
        assert_eq!(ideal_weight_range(dec("180")), (dec("59.9"), dec("80.7")));
        assert_eq!(ideal_weight_range(dec("100")), (dec("18.5"), dec("24.9")));
    }

    #[test]
    fn test_macro_percentages_per_goal() {
        let lose = macro_breakdown(dec("2000"), Goal::Lose);
        assert_eq!(
            (lose.protein.percentage, lose.fat.percentage, lose.carbs.percentage),
            (30, 25, 45)
        );

        let gain = macro_breakdown(dec("2000"), Goal::Gain);
        assert_eq!(
            (gain.protein.percentage, gain.fat.percentage, gain.carbs.percentage),
            (25, 25, 50)
        );

        let fallback = macro_breakdown(dec("2000"), Goal::from_label(Some("recomp")));
        assert_eq!(
            (
                fallback.protein.percentage,
                fallback.fat.percentage,
                fallback.carbs.percentage
            ),
            (25, 30, 45)
        );
    }

    #[test]
    fn test_macro_percentages_sum_to_100() {
        for goal in [Goal::Maintain, Goal::Lose, Goal::Gain] {
            let split = macro_split(goal);
            assert_eq!(split.protein + split.fat + split.carbs, 100, "goal {:?}", goal);
        }
    }

    #[test]
    fn test_macro_grams_and_calories() {
        let macros = macro_breakdown(dec("2759"), Goal::Maintain);

        // 2759 * 0.25 = 689.75 kcal, / 4 = 172.4375 g
        assert_eq!(macros.protein.calories, dec("690"));
        assert_eq!(macros.protein.grams, dec("172"));
        // 2759 * 0.30 = 827.7 kcal, / 9 = 91.97 g
        assert_eq!(macros.fat.calories, dec("828"));
        assert_eq!(macros.fat.grams, dec("92"));
        // 2759 * 0.45 = 1241.55 kcal, / 4 = 310.39 g
        assert_eq!(macros.carbs.calories, dec("1242"));
        assert_eq!(macros.carbs.grams, dec("310"));
    }

    #[test]
    fn test_macro_calories_cover_maintenance_within_rounding() {
        let result = calculate(&reference_profile());
        let macros = result.macros;
        let total = macros.protein.calories + macros.fat.calories + macros.carbs.calories;

        assert!((total - result.maintenance_calories).abs() <= dec("2"));
    }

    #[test]
    fn test_macro_breakdown_is_idempotent() {
        let first = macro_breakdown(dec("2431"), Goal::Lose);
        let second = macro_breakdown(dec("2431"), Goal::Lose);
        assert_eq!(first, second);
    }

    #[test]
    fn test_macro_breakdown_does_not_overflow() {
        let macros = macro_breakdown(Decimal::MAX, Goal::Gain);

        assert_eq!(macros.carbs.percentage, 50);
        assert!(macros.carbs.calories <= Decimal::MAX);
        assert!(macros.fat.grams < macros.fat.calories);
    }

    #[test]
    fn test_calculate_uses_rounded_maintenance_for_macros() {
        let result = calculate(&reference_profile());
        assert_eq!(
            result.macros,
            macro_breakdown(result.maintenance_calories, Goal::Maintain)
        );
    }

    #[test]
    fn test_boundary_profiles_hold_invariants() {
        let levels = [
            ActivityLevel::Sedentary,
            ActivityLevel::Light,
            ActivityLevel::Moderate,
            ActivityLevel::Active,
            ActivityLevel::VeryActive,
        ];

        for age in [15, 100] {
            for gender in [Gender::Male, Gender::Female] {
                for (weight, height) in [
                    ("30", "100"),
                    ("30", "250"),
                    ("300", "100"),
                    ("300", "250"),
                ] {
                    for body_fat in [None, Some(dec("5")), Some(dec("50"))] {
                        for level in levels {
                            let result = calculate(&BodyProfile {
                                age,
                                gender,
                                weight_kg: dec(weight),
                                height_cm: dec(height),
                                activity_level: level,
                                body_fat_percent: body_fat,
                                goal: Goal::Lose,
                            });

                            assert!(result.weight_loss_calories >= result.bmr);
                            assert!(result.maintenance_calories >= result.bmr);
                            assert!(result.ideal_weight_min < result.ideal_weight_max);
                        }
                    }
                }
            }
        }
    }
}
