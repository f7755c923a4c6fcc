//! Business logic services.

pub mod category;
pub mod dashboard;
pub mod product;
