//! Storage layer
//!
//! An in-memory transactional store behind a small repository surface.
//! Mutations run inside [`MemoryStore::transaction`], which commits all
//! writes of a closure or none of them.

mod memory;
pub mod seed;

pub use memory::{MemoryStore, Tables};

use shared::AppError;
use thiserror::Error;

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("{0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(resource) => AppError::not_found(resource),
            StoreError::Duplicate(resource) => {
                AppError::conflict(format!("{} already exists", resource))
            }
            StoreError::Conflict(msg) => AppError::conflict(msg),
        }
    }
}
