//! Result type alias for sluice
//!
//! This module provides a convenient Result type alias that uses
//! SluiceError as the error type.

use super::errors::SluiceError;

/// Result type alias for sluice operations
///
/// This is a convenience type alias that uses `SluiceError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use sluice::domain::result::Result;
/// use sluice::domain::errors::SluiceError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SluiceError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SluiceError>;
