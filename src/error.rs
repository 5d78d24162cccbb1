use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TldError {
    /// The window start sorts after its end, so no date could ever match.
    #[error("invalid date window: begin is after end")]
    InvalidRange,

    #[error("out of memory while growing the suffix tree")]
    OutOfMemory,
}
