//! Exec-hook return values.

/// What an exec hook hands back to the exec phase.
///
/// `T` is the executable type of the executor ([`Task`](crate::plugin::sync::Task)
/// or [`AsyncTask`](crate::plugin::asynchronous::AsyncTask)), `R` the result type.
pub enum ExecOutcome<T, R> {
    /// Leave the accumulated executable or value as it is.
    Unchanged,
    /// Replace the accumulated result with this value, dropping any pending executable.
    Value(R),
    /// Install a new executable that wraps the one the hook received.
    Wrapper(T),
}
