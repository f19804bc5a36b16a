//! Result type alias for Reportflow

use super::errors::ReportflowError;

/// Result type alias for Reportflow operations
///
/// # Examples
///
/// ```
/// use reportflow::domain::result::Result;
/// use reportflow::domain::errors::ReportflowError;
///
/// fn failing_function() -> Result<()> {
///     Err(ReportflowError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ReportflowError>;
