use std::collections::{HashMap, HashSet};

use crate::errors::ValidationError;
use crate::money::Money;
use crate::schemas::{Expense, Participant, PersonalBalance, SplitRule, UserName};

/// Computes each participant's net position: total paid minus total owed.
///
/// The payer of an expense is credited its full amount and every beneficiary
/// is debited their share, so a payer who is also a beneficiary ends up
/// owing only the other beneficiaries' shares. Participants untouched by any
/// expense stay in the output with a zero balance, and the returned entries
/// keep the roster's order.
///
/// Validation is fail-fast: the first invalid expense rejects the whole
/// batch. The resulting balances always sum to exactly zero.
pub fn compute_balances(
    participants: &[Participant],
    expenses: &[Expense],
) -> Result<Vec<PersonalBalance>, ValidationError> {
    let mut totals: HashMap<&str, Money> = participants
        .iter()
        .map(|p| (p.name.as_str(), Money::ZERO))
        .collect();

    for expense in expenses {
        let shares = expense_shares(participants, expense)?;
        // expense_shares has already checked membership of the payer and
        // every beneficiary against the roster.
        if let Some(total) = totals.get_mut(expense.payer.as_str()) {
            *total += expense.amount;
        }
        for (name, share) in &shares {
            if let Some(total) = totals.get_mut(name.as_str()) {
                *total -= *share;
            }
        }
    }

    Ok(participants
        .iter()
        .map(|p| PersonalBalance {
            name: p.name.clone(),
            balance: totals[p.name.as_str()],
        })
        .collect())
}

/// Validates a single expense against the roster and allocates its amount
/// across the beneficiaries. The returned shares sum exactly to the expense
/// amount.
///
/// For custom splits the supplied shares may be off by at most one cent in
/// total; that cent is absorbed into the largest share so the allocation
/// still sums exactly to the amount.
pub fn expense_shares(
    participants: &[Participant],
    expense: &Expense,
) -> Result<Vec<(UserName, Money)>, ValidationError> {
    if !expense.amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount(expense.amount));
    }
    if expense.beneficiaries.is_empty() {
        return Err(ValidationError::NoBeneficiaries);
    }

    let roster: HashSet<&str> = participants.iter().map(|p| p.name.as_str()).collect();
    if !roster.contains(expense.payer.as_str()) {
        return Err(ValidationError::UnknownParticipant(expense.payer.clone()));
    }
    let mut seen = HashSet::new();
    for name in &expense.beneficiaries {
        if !roster.contains(name.as_str()) {
            return Err(ValidationError::UnknownParticipant(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(ValidationError::DuplicateBeneficiary(name.clone()));
        }
    }

    let shares = match &expense.split {
        SplitRule::Equal => expense.amount.split_even(expense.beneficiaries.len()),
        SplitRule::Custom { shares } => {
            if shares.len() != expense.beneficiaries.len() {
                return Err(ValidationError::ShareCountMismatch {
                    beneficiaries: expense.beneficiaries.len(),
                    shares: shares.len(),
                });
            }
            if let Some((name, share)) = expense
                .beneficiaries
                .iter()
                .zip(shares)
                .find(|(_, share)| share.is_negative())
            {
                return Err(ValidationError::NegativeShare {
                    name: name.clone(),
                    share: *share,
                });
            }
            let share_total: Money = shares.iter().copied().sum();
            let residual = expense.amount - share_total;
            if residual.abs() > Money::UNIT {
                return Err(ValidationError::ShareSumMismatch {
                    amount: expense.amount,
                    share_total,
                });
            }
            let mut shares = shares.clone();
            if !residual.is_zero() {
                if let Some(largest) = shares.iter_mut().max_by_key(|s| **s) {
                    *largest += residual;
                }
            }
            shares
        }
    };

    Ok(expense.beneficiaries.iter().cloned().zip(shares).collect())
}
