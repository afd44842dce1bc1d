use fairsplit_common::ShareEntry;
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::errors::LedgerError;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Holder of the lifecycle capability
    Controller,
    /// Token accepted on deposit and paid out on withdraw
    Token,
    /// Lifetime distribution ceiling
    Cap,
    /// Share table in initialization order
    Shares,
    /// Share weight per beneficiary (mirror of `Shares` for O(1) lookup)
    Share(Address),
    /// Amount already paid to a beneficiary
    Released(Address),
    TotalReceived,
    TotalReleased,
    /// Halted flag
    Halted,
    /// Set once `TotalReleased` first equals `Cap`
    CapReached,
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Cap)
}

pub fn require_initialized(env: &Env) -> Result<(), LedgerError> {
    if is_initialized(env) {
        Ok(())
    } else {
        Err(LedgerError::NotInitialized)
    }
}

pub fn set_controller(env: &Env, controller: &Address) {
    env.storage().instance().set(&DataKey::Controller, controller);
}

pub fn get_controller(env: &Env) -> Result<Address, LedgerError> {
    env.storage()
        .instance()
        .get(&DataKey::Controller)
        .ok_or(LedgerError::NotInitialized)
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
}

pub fn get_token(env: &Env) -> Result<Address, LedgerError> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(LedgerError::NotInitialized)
}

pub fn set_cap(env: &Env, cap: i128) {
    env.storage().instance().set(&DataKey::Cap, &cap);
}

pub fn get_cap(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::Cap).unwrap_or(0)
}

/// Store the table and seed per-beneficiary balances.
pub fn set_share_table(env: &Env, shares: &Vec<ShareEntry>) {
    for entry in shares.iter() {
        env.storage()
            .instance()
            .set(&DataKey::Share(entry.beneficiary.clone()), &entry.weight);
        env.storage()
            .instance()
            .set(&DataKey::Released(entry.beneficiary), &0i128);
    }
    env.storage().instance().set(&DataKey::Shares, shares);
}

pub fn get_share_table(env: &Env) -> Vec<ShareEntry> {
    env.storage()
        .instance()
        .get(&DataKey::Shares)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn get_share(env: &Env, beneficiary: &Address) -> Option<u32> {
    env.storage()
        .instance()
        .get(&DataKey::Share(beneficiary.clone()))
}

pub fn get_released(env: &Env, beneficiary: &Address) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::Released(beneficiary.clone()))
        .unwrap_or(0)
}

pub fn set_released(env: &Env, beneficiary: &Address, amount: i128) {
    env.storage()
        .instance()
        .set(&DataKey::Released(beneficiary.clone()), &amount);
}

pub fn get_total_received(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalReceived)
        .unwrap_or(0)
}

pub fn set_total_received(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalReceived, &amount);
}

pub fn get_total_released(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::TotalReleased)
        .unwrap_or(0)
}

pub fn set_total_released(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::TotalReleased, &amount);
}

pub fn is_cap_reached(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::CapReached)
        .unwrap_or(false)
}

pub fn mark_cap_reached(env: &Env) {
    env.storage().instance().set(&DataKey::CapReached, &true);
}
