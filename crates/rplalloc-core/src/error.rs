//! Allocation and configuration error types.

use std::error::Error;
use std::fmt;

/// Which entry point produced an [`AllocError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllocOp {
    /// A fresh allocation (`malloc`).
    Allocate,
    /// A resize of an existing block, or of null (`realloc`).
    Resize,
}

impl fmt::Display for AllocOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocate => write!(f, "allocate"),
            Self::Resize => write!(f, "resize"),
        }
    }
}

/// The underlying allocator could not satisfy a request.
///
/// This is the only failure the shim reports, and it always comes from the
/// allocator: a zero-size argument alone never produces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError {
    /// The entry point that failed.
    pub op: AllocOp,
    /// The size the caller asked for, before any zero-size substitution.
    pub requested: usize,
}

impl AllocError {
    pub(crate) fn new(op: AllocOp, requested: usize) -> Self {
        Self { op, requested }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed: allocator could not provide {} bytes",
            self.op, self.requested
        )
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_operation_and_size() {
        let e = AllocError::new(AllocOp::Resize, 4096);
        assert_eq!(
            e.to_string(),
            "resize failed: allocator could not provide 4096 bytes"
        );
    }

    #[test]
    fn zero_request_is_reported_as_zero() {
        let e = AllocError::new(AllocOp::Allocate, 0);
        assert_eq!(e.requested, 0);
        assert!(e.to_string().starts_with("allocate failed"));
    }
}
