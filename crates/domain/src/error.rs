//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RoomwatchError`] via `#[from]` or an adapter-side `into_domain()`.

/// Boxed error used as the source of IO-flavoured variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum RoomwatchError {
    /// A value violated a domain invariant.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The presence detector could not produce a sample.
    #[error("sample capture failed: {0}")]
    Sampling(#[source] BoxError),

    /// A transition event could not be delivered.
    #[error("transition delivery failed: {0}")]
    Delivery(#[source] BoxError),

    /// The device backend rejected or failed a command.
    #[error("device command failed: {0}")]
    Command(#[source] BoxError),

    /// A worker thread could not be started.
    #[error("failed to spawn worker thread")]
    Thread(#[source] std::io::Error),
}

impl RoomwatchError {
    /// Wrap any error as a [`RoomwatchError::Sampling`].
    pub fn sampling(err: impl Into<BoxError>) -> Self {
        Self::Sampling(err.into())
    }

    /// Wrap any error as a [`RoomwatchError::Delivery`].
    pub fn delivery(err: impl Into<BoxError>) -> Self {
        Self::Delivery(err.into())
    }

    /// Wrap any error as a [`RoomwatchError::Command`].
    pub fn command(err: impl Into<BoxError>) -> Self {
        Self::Command(err.into())
    }
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A window must hold at least one sample.
    #[error("window length must be greater than zero")]
    EmptyWindow,

    /// The vote threshold must lie strictly between 0 and 1.
    #[error("vote threshold {0} must be within (0, 1)")]
    ThresholdOutOfRange(f64),

    /// A streaming source id was empty.
    #[error("streaming source must not be empty")]
    EmptySource,

    /// An automation plan branch had no steps.
    #[error("automation branch `{0}` has no steps")]
    EmptyBranch(&'static str),

    /// A `room` payload could not be interpreted as a boolean.
    #[error("invalid person_in_room value `{0}`")]
    InvalidPresenceValue(String),
}
