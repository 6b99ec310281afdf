use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parses `male`/`female` (or `m`/`f`), ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Lenient parse: anything unrecognised, including a missing label, is `Sedentary`.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(raw) = label else {
            return Self::default();
        };

        match normalize_label(raw).as_str() {
            "sedentary" => Self::Sedentary,
            "light" => Self::Light,
            "moderate" => Self::Moderate,
            "active" => Self::Active,
            "very_active" => Self::VeryActive,
            _ => {
                tracing::debug!(label = raw, "Unknown activity level, using sedentary");
                Self::default()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Maintain,
    Lose,
    Gain,
}

impl Goal {
    /// Lenient parse: anything other than `lose` or `gain` is `Maintain`.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(raw) = label else {
            return Self::default();
        };

        match normalize_label(raw).as_str() {
            "lose" => Self::Lose,
            "gain" => Self::Gain,
            "maintain" => Self::Maintain,
            _ => {
                tracing::debug!(label = raw, "Unknown goal, using maintain");
                Self::default()
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintain => "maintain",
            Self::Lose => "lose",
            Self::Gain => "gain",
        }
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Body measurements fed to the calorie engine.
///
/// Ranges are enforced by the request layer; the engine trusts them.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyProfile {
    pub age: u32,
    pub gender: Gender,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub activity_level: ActivityLevel,
    pub body_fat_percent: Option<Decimal>,
    pub goal: Goal,
}

/// The single active profile stored for a user, replaced on every submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub activity_level: String,
    pub body_fat_percent: Option<Decimal>,
    pub goal: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserProfile {
    /// Rebuilds the engine input from the stored columns.
    ///
    /// Returns `None` when a stored gender or age can no longer be interpreted.
    pub fn body_profile(&self) -> Option<BodyProfile> {
        Some(BodyProfile {
            age: u32::try_from(self.age).ok()?,
            gender: Gender::from_label(&self.gender)?,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            activity_level: ActivityLevel::from_label(Some(&self.activity_level)),
            body_fat_percent: self.body_fat_percent,
            goal: Goal::from_label(Some(&self.goal)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_labels() {
        assert_eq!(Gender::from_label("Male"), Some(Gender::Male));
        assert_eq!(Gender::from_label(" f "), Some(Gender::Female));
        assert_eq!(Gender::from_label("other"), None);
    }

    #[test]
    fn test_activity_level_labels() {
        assert_eq!(ActivityLevel::from_label(Some("moderate")), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_label(Some("Very Active")), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from_label(Some("very-active")), ActivityLevel::VeryActive);
    }

    #[test]
    fn test_unknown_activity_level_falls_back_to_sedentary() {
        assert_eq!(ActivityLevel::from_label(Some("couch")), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_label(Some("")), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_label(None), ActivityLevel::Sedentary);
    }

    #[test]
    fn test_unknown_goal_falls_back_to_maintain() {
        assert_eq!(Goal::from_label(Some("LOSE")), Goal::Lose);
        assert_eq!(Goal::from_label(Some("gain")), Goal::Gain);
        assert_eq!(Goal::from_label(Some("bulk")), Goal::Maintain);
        assert_eq!(Goal::from_label(None), Goal::Maintain);
    }

    #[test]
    fn test_stored_profile_round_trips_to_body_profile() {
        let now = chrono::Utc::now().naive_utc();
        let stored = UserProfile {
            user_id: Uuid::new_v4(),
            age: 30,
            gender: "male".to_string(),
            weight_kg: Decimal::from(80),
            height_cm: Decimal::from(180),
            activity_level: "moderate".to_string(),
            body_fat_percent: None,
            goal: "lose".to_string(),
            created_at: now,
            updated_at: now,
        };

        let body = stored.body_profile().unwrap();
        assert_eq!(body.age, 30);
        assert_eq!(body.gender, Gender::Male);
        assert_eq!(body.activity_level, ActivityLevel::Moderate);
        assert_eq!(body.goal, Goal::Lose);
    }

    #[test]
    fn test_stored_profile_with_bad_gender_is_rejected() {
        let now = chrono::Utc::now().naive_utc();
        let stored = UserProfile {
            user_id: Uuid::new_v4(),
            age: 30,
            gender: "unknown".to_string(),
            weight_kg: Decimal::from(80),
            height_cm: Decimal::from(180),
            activity_level: "moderate".to_string(),
            body_fat_percent: None,
            goal: "maintain".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert!(stored.body_profile().is_none());
    }
}
