//! # Lifecycle Guard
//!
//! A single halted/active switch consulted by every mutating ledger call.
//!
//! - Only the controller recorded at initialization may flip the switch.
//!   The controller address is the capability: whoever can authorize as it
//!   may halt or resume, and it can be handed to a new address.
//! - While halted, `deposit` and `withdraw` fail with `Halted`; every read
//!   stays available.
//! - Halting and resuming never touch accumulated balances.

use soroban_sdk::{Address, Env};

use crate::errors::LedgerError;
use crate::storage::{self, DataKey};

pub fn is_halted(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Halted)
        .unwrap_or(false)
}

pub fn set_halted(env: &Env, halted: bool) {
    env.storage().instance().set(&DataKey::Halted, &halted);
}

/// Fail with `Halted` unless the ledger is active.
pub fn require_active(env: &Env) -> Result<(), LedgerError> {
    if is_halted(env) {
        return Err(LedgerError::Halted);
    }
    Ok(())
}

/// Require that `caller` is the controller and has authorized this call.
pub fn require_controller(env: &Env, caller: &Address) -> Result<(), LedgerError> {
    let controller = storage::get_controller(env)?;
    if *caller != controller {
        return Err(LedgerError::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}
