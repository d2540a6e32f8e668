//! Command implementations.

pub mod base_model;
pub mod demo;
