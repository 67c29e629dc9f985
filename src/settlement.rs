use crate::errors::InvariantViolation;
use crate::money::Money;
use crate::schemas::{PersonalBalance, Transfer, UserName};

/// A participant with an outstanding magnitude still to settle.
struct Outstanding {
    name: UserName,
    remaining: Money,
}

/// Turns net balances into an ordered list of transfers that zeroes every
/// balance.
///
/// Greedy matching: the largest outstanding debtor pays the largest
/// outstanding creditor `min(debt, credit)`, repeated until both sides are
/// exhausted. Ties between equal magnitudes go to the participant listed
/// first in the input, so the plan is deterministic for a given input.
///
/// The balances must sum to zero. A residue of a single cent (left by
/// earlier rounding) is charged to the largest-magnitude balance, which
/// places it on the largest transfer of the plan; anything bigger is an
/// [`InvariantViolation`].
pub fn compute_settlement(
    balances: &[PersonalBalance],
) -> Result<Vec<Transfer>, InvariantViolation> {
    let residual: Money = balances.iter().map(|b| b.balance).sum();
    if residual.abs() > Money::UNIT {
        return Err(InvariantViolation { residual });
    }

    let mut balances = balances.to_vec();
    if !residual.is_zero() {
        if let Some(largest) = balances.iter_mut().max_by_key(|b| b.balance.abs()) {
            largest.balance -= residual;
        }
    }

    // Partition keeping input order, so that largest_index tie-breaks
    // resolve to the first participant listed.
    let mut debtors: Vec<Outstanding> = Vec::new();
    let mut creditors: Vec<Outstanding> = Vec::new();
    for entry in balances {
        if entry.balance.is_negative() {
            debtors.push(Outstanding {
                name: entry.name,
                remaining: entry.balance.abs(),
            });
        } else if entry.balance.is_positive() {
            creditors.push(Outstanding {
                name: entry.name,
                remaining: entry.balance,
            });
        }
    }

    let mut transfers = Vec::new();
    while !debtors.is_empty() && !creditors.is_empty() {
        let di = largest_index(&debtors);
        let ci = largest_index(&creditors);
        let amount = debtors[di].remaining.min(creditors[ci].remaining);

        transfers.push(Transfer {
            debtor: debtors[di].name.clone(),
            creditor: creditors[ci].name.clone(),
            amount,
        });

        debtors[di].remaining -= amount;
        creditors[ci].remaining -= amount;
        if debtors[di].remaining.is_zero() {
            debtors.remove(di);
        }
        if creditors[ci].remaining.is_zero() {
            creditors.remove(ci);
        }
    }

    Ok(transfers)
}

/// Index of the largest outstanding magnitude; the first entry wins ties.
fn largest_index(entries: &[Outstanding]) -> usize {
    let mut best = 0;
    for (i, entry) in entries.iter().enumerate().skip(1) {
        if entry.remaining > entries[best].remaining {
            best = i;
        }
    }
    best
}
