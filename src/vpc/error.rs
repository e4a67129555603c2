//! Error types for VPC construction.

use thiserror::Error;

/// Raised before any engine call when a required argument is absent.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("missing required argument '{0}'")]
pub struct MissingArgument(pub &'static str);

/// Errors raised while constructing a [`crate::Vpc`].
#[derive(Debug, Error)]
pub enum VpcError<EngineError>
where
    EngineError: std::error::Error + 'static,
{
    /// Raised when validation rejects the arguments.
    #[error(transparent)]
    MissingArgument(#[from] MissingArgument),
    /// Raised when the engine refuses a registration. The engine's error is
    /// kept intact as the source.
    #[error("resource registration failed: {0}")]
    Registration(#[source] EngineError),
}
