pub mod calculation;
pub mod profile;
