//! Convenience result type alias for ChemTrack.

use crate::error::AppError;

/// A specialized `Result` type for ChemTrack operations.
pub type AppResult<T> = Result<T, AppError>;
