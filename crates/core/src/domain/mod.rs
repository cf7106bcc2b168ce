pub mod strategy;
pub mod supplier;
