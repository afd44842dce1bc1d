//! # Share Normalizer
//!
//! Converts heterogeneous contribution amounts into a beneficiary share table
//! whose integer weights sum to exactly [`S_TOTAL`].
//!
//! ## Algorithm
//!
//! 1. `weight_i = round(contribution_i / Σ contributions × S_TOTAL)`, computed
//!    exactly as `(2 × c_i × S_TOTAL + Σ) / (2 × Σ)` (round half up).
//! 2. Any weight that rounds to 0 is rejected with
//!    [`ShareError::DegenerateShare`].
//! 3. The signed residual `S_TOTAL - Σ weight_i` is applied in full to the
//!    entry with the largest raw contribution. Ties go to the first
//!    occurrence in input order.
//!
//! Output order always matches input order.
//!
//! Duplicate beneficiaries are rejected here. Callers holding raw records
//! should fold them with [`aggregate_contributions`] first.

use soroban_sdk::{contracterror, Env, Vec};

use crate::constants::{MAX_BENEFICIARIES, S_TOTAL};
use crate::types::{Contribution, ShareEntry};

/// Validation failures of the share normalizer.
///
/// Discriminants match the validation range of the ledger and registry
/// error enums so clients see one code per condition.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum ShareError {
    /// No contributions were supplied.
    EmptyInput = 1,
    /// A contribution amount was zero or negative.
    NonPositiveAmount = 2,
    /// The same beneficiary appears more than once.
    DuplicateBeneficiary = 3,
    /// A beneficiary's share would round to zero (or below after correction).
    DegenerateShare = 4,
    /// More than `MAX_BENEFICIARIES` entries.
    TooManyBeneficiaries = 7,
    /// Sum or scaled amount does not fit in `i128`.
    AmountOverflow = 8,
}

/// Normalize contributions into a share table summing to `S_TOTAL`.
pub fn normalize_shares(
    env: &Env,
    contributions: &Vec<Contribution>,
) -> Result<Vec<ShareEntry>, ShareError> {
    let count = contributions.len();
    if count == 0 {
        return Err(ShareError::EmptyInput);
    }
    if count > MAX_BENEFICIARIES {
        return Err(ShareError::TooManyBeneficiaries);
    }

    if contributions.iter().any(|c| c.amount <= 0) {
        return Err(ShareError::NonPositiveAmount);
    }

    let mut total = 0i128;
    for (i, contribution) in contributions.iter().enumerate() {
        if contributions
            .iter()
            .skip(i + 1)
            .any(|other| other.beneficiary == contribution.beneficiary)
        {
            return Err(ShareError::DuplicateBeneficiary);
        }
        total = total
            .checked_add(contribution.amount)
            .ok_or(ShareError::AmountOverflow)?;
    }

    let scale = 2 * S_TOTAL as i128;
    let denominator = total.checked_mul(2).ok_or(ShareError::AmountOverflow)?;

    let mut shares = Vec::new(env);
    let mut assigned = 0i128;
    let mut largest_index = 0u32;
    let mut largest_amount = 0i128;

    for (i, contribution) in contributions.iter().enumerate() {
        let weight = contribution
            .amount
            .checked_mul(scale)
            .and_then(|scaled| scaled.checked_add(total))
            .ok_or(ShareError::AmountOverflow)?
            / denominator;
        if weight == 0 {
            return Err(ShareError::DegenerateShare);
        }
        // Strict comparison keeps the first occurrence on ties.
        if contribution.amount > largest_amount {
            largest_amount = contribution.amount;
            largest_index = i as u32;
        }
        assigned += weight;
        shares.push_back(ShareEntry {
            beneficiary: contribution.beneficiary,
            // weight <= S_TOTAL since contribution <= total
            weight: weight as u32,
        });
    }

    let residual = S_TOTAL as i128 - assigned;
    if residual != 0 {
        let mut largest = shares
            .get(largest_index)
            .ok_or(ShareError::DegenerateShare)?;
        let corrected = largest.weight as i128 + residual;
        if corrected <= 0 || corrected > S_TOTAL as i128 {
            return Err(ShareError::DegenerateShare);
        }
        largest.weight = corrected as u32;
        shares.set(largest_index, largest);
    }

    Ok(shares)
}

/// Fold duplicate beneficiaries by summing their contributions.
///
/// The first occurrence of each beneficiary fixes its position in the output.
pub fn aggregate_contributions(
    env: &Env,
    contributions: &Vec<Contribution>,
) -> Result<Vec<Contribution>, ShareError> {
    let mut aggregated: Vec<Contribution> = Vec::new(env);

    for contribution in contributions.iter() {
        if contribution.amount <= 0 {
            return Err(ShareError::NonPositiveAmount);
        }
        match aggregated
            .iter()
            .position(|existing| existing.beneficiary == contribution.beneficiary)
        {
            Some(index) => {
                let index = index as u32;
                let mut existing = aggregated
                    .get(index)
                    .ok_or(ShareError::DuplicateBeneficiary)?;
                existing.amount = existing
                    .amount
                    .checked_add(contribution.amount)
                    .ok_or(ShareError::AmountOverflow)?;
                aggregated.set(index, existing);
            }
            None => aggregated.push_back(contribution),
        }
    }

    Ok(aggregated)
}

/// Sum of all weights in a share table, widened to avoid overflow.
pub fn share_table_total(shares: &Vec<ShareEntry>) -> u64 {
    shares.iter().map(|entry| entry.weight as u64).sum()
}

/// Structural check a ledger runs before accepting a share table.
///
/// Valid tables are non-empty, hold at most `MAX_BENEFICIARIES` unique
/// beneficiaries, have every weight > 0 and sum to exactly `S_TOTAL`.
pub fn validate_share_table(shares: &Vec<ShareEntry>) -> bool {
    let count = shares.len();
    if count == 0 || count > MAX_BENEFICIARIES {
        return false;
    }

    for (i, entry) in shares.iter().enumerate() {
        if entry.weight == 0 {
            return false;
        }
        if shares
            .iter()
            .skip(i + 1)
            .any(|other| other.beneficiary == entry.beneficiary)
        {
            return false;
        }
    }

    share_table_total(shares) == S_TOTAL as u64
}
