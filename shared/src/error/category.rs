//! Error categories
//!
//! Coarse grouping of error codes, derived from their numeric band.
//! Used for logging decisions (system errors are logged at error level,
//! business errors are not).

use serde::{Deserialize, Serialize};

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General request/validation errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission / ownership errors (2xxx)
    Permission,
    /// Order pipeline errors (4xxx)
    Order,
    /// Cart errors (5xxx)
    Cart,
    /// Catalog lookup errors (6xxx)
    Catalog,
    /// System / storage errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Whether errors in this category indicate a server-side fault
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System)
    }
}
