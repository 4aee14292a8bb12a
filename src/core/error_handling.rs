//! Generic error handling utilities
//!
//! Provides unified error reporting across the crate's error types while
//! keeping the distinction between caller mistakes and system failures.

/// Trait for errors that can distinguish between caller-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` describing what the caller did wrong. When it returns
/// `false`, `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if the error was caused by how the caller used the API
    /// (state preconditions, capacity limits, bad configuration values)
    /// rather than by an internal failure (poisoned locks, IO).
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific caller-facing message for actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log an error with a detail level based on error specificity
///
/// Actionable errors log their specific message; system errors log the
/// operation context. Full details always follow at debug level.
///
/// This is the reporting path for failures that cannot be returned to a
/// caller, such as a queue entry release running inside `Drop`.
///
/// # Examples
/// ```rust,no_run
/// # use keyqueue::core::error_handling::log_error_with_context;
/// # use keyqueue::processor::api::ProcessorError;
/// let error = ProcessorError::LockPoisoned { message: "table".to_string() };
/// log_error_with_context(&error, "Releasing queue entry");
/// // Logs: "Releasing queue entry failed"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("{}: {}", operation_context, user_msg);
        }
        _ => {
            log::error!("{} failed", operation_context);
        }
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
