//! Common numeric building blocks

pub mod errors;
pub mod fixed_point;
