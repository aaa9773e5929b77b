//! # Diagnostics Facade
//!
//! The only logging surface the pool and event code talks to. Nothing here
//! is fatal: a failed assertion is logged and reported back to the caller,
//! which decides whether to continue.

/// Logs a non-fatal diagnostic.
#[inline]
pub fn warn(message: &str) {
    tracing::warn!(target: "revenant", "{message}");
}

/// Checks `condition`, logging `message` at error level when it does not hold.
///
/// Returns `condition` so call sites can bail out:
///
/// ```rust
/// use revenant_shared::diag;
///
/// let size = 0;
/// if !diag::assert_true(size > 0, "pool size must be positive") {
///     // recover
/// }
/// ```
#[inline]
pub fn assert_true(condition: bool, message: &str) -> bool {
    if !condition {
        tracing::error!(target: "revenant", "assertion failed: {message}");
    }
    condition
}

/// Extracts a printable message from a caught panic payload.
#[must_use]
pub fn panic_message(cause: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = cause.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}
