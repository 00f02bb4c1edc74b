use thiserror::Error;

/// Failures reported by cursor operations.
///
/// Resolution itself never fails: a source that cannot produce more elements
/// simply ends the cursor.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("failed to reserve storage for a map chain entry")]
    Allocation,
    #[error("writing cursor output failed: {0}")]
    Io(#[from] std::io::Error),
}
