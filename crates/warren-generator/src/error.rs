use thiserror::Error;

/// Errors returned when building or advancing a [`CodeProgress`](crate::CodeProgress).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("code length must be at least 1")]
    ZeroLength,
    #[error("prefix has {len} characters but codes are {target} long")]
    PrefixTooLong { len: usize, target: usize },
    #[error("character {0:?} is not in the short-code alphabet")]
    InvalidCharacter(char),
    #[error("code is already complete")]
    AlreadyFinished,
}
