//! Convenience result type alias for LexVault.

use crate::error::AppError;

/// A specialized `Result` type for LexVault operations.
pub type AppResult<T> = Result<T, AppError>;
