pub mod calculator;
pub mod common;
