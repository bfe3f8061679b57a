//! Shared types for PharmScope: errors, configuration, and the persisted
//! market-research record shapes.

pub mod config;
pub mod error;
pub mod records;
pub mod text;

pub use config::{DataPaths, PharmScopeConfig};
pub use error::{Error, Result};
pub use records::*;
