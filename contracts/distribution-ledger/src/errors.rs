//! # Ledger Error Taxonomy
//!
//! Discriminants are grouped so clients can classify a failure from the raw
//! code alone:
//!
//! | Range  | Class          | Client action                  |
//! |--------|----------------|--------------------------------|
//! | 1–19   | Validation     | Fix the input; never retry     |
//! | 20–29  | State conflict | Retry later (e.g. after resume) |
//! | 30+    | Transfer       | State untouched; retry the call |

use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum LedgerError {
    // Validation
    EmptyInput = 1,
    NonPositiveAmount = 2,
    DuplicateBeneficiary = 3,
    DegenerateShare = 4,
    /// Cap is not in `1..=MAX_CAP`.
    InvalidCap = 5,
    /// Share table is empty, oversized, has a zero weight, repeats a
    /// beneficiary or does not sum to `S_TOTAL`.
    InvalidShareTable = 6,
    TooManyBeneficiaries = 7,
    AmountOverflow = 8,
    AlreadyInitialized = 9,
    /// Caller does not hold the lifecycle capability.
    Unauthorized = 10,

    // State conflict
    UnknownBeneficiary = 20,
    NothingDue = 21,
    Halted = 22,
    NotInitialized = 23,

    // Transfer
    /// Token transfer failed; every write of the call was rolled back.
    TransferFailed = 30,
}

/// Coarse classification of a [`LedgerError`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Validation,
    StateConflict,
    Transfer,
}

impl LedgerError {
    pub fn class(&self) -> ErrorClass {
        match *self as u32 {
            0..=19 => ErrorClass::Validation,
            20..=29 => ErrorClass::StateConflict,
            _ => ErrorClass::Transfer,
        }
    }

    /// True when waiting (for a deposit, a resume, or a retried transfer)
    /// may let the same call succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.class(), ErrorClass::Validation)
    }
}

