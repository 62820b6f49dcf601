use thiserror::Error;

/// Errors surfaced by the activation controller.
///
/// Activation itself never fails; only initialization can give up, and only
/// once the retry policy is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("animation runtime still unavailable after {attempts} attempts")]
    RuntimeUnavailable { attempts: u32 },
    #[error("invalid controller config: {0}")]
    InvalidConfig(String),
}
