use thiserror::Error;

/// Content errors raised while checking an incoming entity.
///
/// Checks run in declared field order, so the first failing field is the
/// one reported and messages are stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid book. missing required field: {0}")]
    RequiredFieldMissing(&'static str),

    #[error("empty review provided. please enter a message")]
    EmptyMessage,

    #[error("review message is too long")]
    MessageTooLong,

    #[error("empty forename/surname provided. please enter a valid user")]
    EmptyUser,
}
