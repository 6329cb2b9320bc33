//! Load test modules

pub mod concurrent_joins;
