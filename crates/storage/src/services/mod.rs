pub mod calculation_history;
pub mod calorie_engine;
