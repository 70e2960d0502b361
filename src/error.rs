use super::*;

/// Why a transition was refused.
///
/// Every variant is recoverable: the hand the caller passed in is untouched
/// and can be acted on again.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The seat cannot take this action in its current state.
    #[error("illegal action: {0}")]
    IllegalAction(String),
    /// A raise grew the bet by less than the last full raise.
    #[error("raise of {increment} is below the minimum raise of {minimum}")]
    BelowMinimumRaise { increment: Chips, minimum: Chips },
    /// The hand or round is not accepting this request right now.
    #[error("out of sequence: {0}")]
    OutOfSequence(String),
    /// Blinds, ante, table size or seating rejected at hand start.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Showdown verdicts that do not describe a possible result.
    #[error("invalid outcome: {0}")]
    InvalidOutcome(String),
}

impl EngineError {
    pub fn illegal(msg: impl Into<String>) -> Self {
        Self::IllegalAction(msg.into())
    }
    pub fn sequence(msg: impl Into<String>) -> Self {
        Self::OutOfSequence(msg.into())
    }
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
    pub fn outcome(msg: impl Into<String>) -> Self {
        Self::InvalidOutcome(msg.into())
    }
}
