//! Error types for the splitbill core and its store.

use thiserror::Error;

use crate::money::Money;

/// Rejected expense input. Validation is fail-fast: the first invalid
/// expense rejects the whole batch and nothing is partially applied.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Payer or beneficiary that is not part of the event
    #[error("unknown participant '{0}'")]
    UnknownParticipant(String),

    #[error("expense amount {0} is not positive")]
    NonPositiveAmount(Money),

    #[error("expense has no beneficiaries")]
    NoBeneficiaries,

    #[error("beneficiary '{0}' is listed more than once")]
    DuplicateBeneficiary(String),

    #[error("{shares} custom shares supplied for {beneficiaries} beneficiaries")]
    ShareCountMismatch { beneficiaries: usize, shares: usize },

    #[error("negative custom share {share} for '{name}'")]
    NegativeShare { name: String, share: Money },

    #[error("custom shares sum to {share_total}, expense amount is {amount}")]
    ShareSumMismatch { amount: Money, share_total: Money },
}

/// The balances handed to the settlement planner do not sum to zero within
/// one cent. This is always a contract breach by the caller and is never
/// silently tolerated.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("balances sum to {residual}, expected zero")]
pub struct InvariantViolation {
    pub residual: Money,
}

/// Store-level rejection, distinct from core expense validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no event with id '{0}'")]
    UnknownEvent(String),

    #[error("participant name must not be empty")]
    EmptyParticipantName,

    #[error("participant '{0}' already exists")]
    DuplicateParticipant(String),

    #[error(transparent)]
    InvalidExpense(#[from] ValidationError),
}

/// CSV rendering failure.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv buffer error: {0}")]
    Buffer(String),
}
