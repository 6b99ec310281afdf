pub mod calculation;
pub mod profile;

pub use calculation::CalorieCalculation;
pub use profile::{ActivityLevel, BodyProfile, Gender, Goal, UserProfile};
