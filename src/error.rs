use thiserror::Error;

/// Misuse of a [`Cursor`](crate::Cursor).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// `next` was called after the last occurrence had been visited.
    #[error("cursor has no occurrences left to visit")]
    Exhausted,
    /// `remove` was called before `next`, or twice without a `next` in between.
    #[error("no visited occurrence to remove")]
    InvalidRemoval,
}

/// Adding occurrences would push the total past `usize::MAX`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("occurrence count overflow")]
pub struct CountOverflow;
