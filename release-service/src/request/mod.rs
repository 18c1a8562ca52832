pub mod executor;
pub mod models;
pub mod unit;
pub mod validate;
