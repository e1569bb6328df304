//! Engine Module

pub mod constructors;
pub mod database;
pub mod query;
pub mod udf_api;

pub use database::Engine;
