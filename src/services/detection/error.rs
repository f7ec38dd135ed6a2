// Detection errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// The caller sent something that cannot be analyzed.
    #[error("{0}")]
    Validation(String),
    /// A metric came out non-finite; callers recover with the neutral result.
    #[error("analysis failed: {0}")]
    Analysis(String),
}

pub type DetectResult<T> = Result<T, DetectError>;
