//! Data models for extracted campaigns and engine configuration.

pub mod campaign;
pub mod config;
