//! # sitegate-core
//!
//! Core crate for SiteGate. Contains configuration schemas, logging
//! initialisation, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SiteGate crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
