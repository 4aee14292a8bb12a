//! Core services and infrastructure

pub mod config;
pub mod error_handling;
pub mod logging;
pub mod sync;
