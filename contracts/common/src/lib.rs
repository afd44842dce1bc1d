//! Shared share-table types, constants and the share normalizer used by the
//! Fairsplit contracts, plus cross-contract invariant tests.

#![cfg_attr(not(test), no_std)]

pub mod constants;
pub mod share_normalizer;
pub mod types;

pub use constants::{MAX_BENEFICIARIES, MAX_CAP, S_TOTAL};
pub use share_normalizer::{
    aggregate_contributions, normalize_shares, share_table_total, validate_share_table,
    ShareError,
};
pub use types::{Contribution, ShareEntry};
