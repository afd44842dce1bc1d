#![no_std]

//! # Proportional Distribution Ledger Contract
//!
//! Holds incoming funds for a fixed set of beneficiaries and lets each of them
//! pull their proportional share, up to a lifetime cap, in any order and in
//! as many partial withdrawals as they like.
//!
//! ## Accounting Model
//!
//! - `distributable = min(total_received, cap)`
//! - `entitlement(b) = floor(share(b) × distributable / S_TOTAL) - released(b)`
//!
//! Deposits are only recorded; nothing is pre-allocated. Entitlement is
//! recomputed from the share table on every read, so withdrawals may happen
//! in any order without affecting each other. Floor division means the ledger
//! under-pays by at most `S_TOTAL - 1` smallest units in total.
//!
//! ## Invariants
//!
//! - `total_released <= min(total_received, cap)`
//! - `Σ released(b) == total_released`
//! - `Σ share(b) == S_TOTAL`, fixed at initialization
//! - `CapReached` is emitted exactly once
//!
//! ## Withdrawal Ordering
//!
//! `withdraw` commits every state change (released balances, totals, events,
//! cap latch) before it calls the token. If that transfer fails, the call
//! returns `TransferFailed` and the host discards all of its writes.

use fairsplit_common::{validate_share_table, MAX_CAP};
use soroban_sdk::{contract, contractimpl, contracttype, log, token, Address, Env, Vec};

// ─── Feature modules ───
pub mod entitlement;
pub mod errors;
pub mod events;
pub mod lifecycle;
mod storage;
// ─── End feature modules ───

// ─── Re-exports ───
pub use errors::{ErrorClass, LedgerError};
pub use events::{
    CapReachedEvent, ControlTransferredEvent, DepositReceivedEvent, InitializedEvent,
    LifecycleChangedEvent, WithdrawnEvent,
};
pub use fairsplit_common::{ShareEntry, MAX_BENEFICIARIES, S_TOTAL};
// ─── End re-exports ───

#[cfg(test)]
mod transfer_test;
// ─── End test modules ───

/// Point-in-time view of the ledger totals for dashboards.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerSnapshot {
    pub cap: i128,
    pub total_received: i128,
    pub total_released: i128,
    pub remaining_cap: i128,
    pub halted: bool,
    /// `total_released == cap`; no further withdrawal can succeed
    pub retired: bool,
}

#[contract]
pub struct DistributionLedgerContract;

#[contractimpl]
impl DistributionLedgerContract {
    // ── Initialization ──────────────────────────────────────────────

    /// Commit the share table and cap. One-time.
    ///
    /// # Parameters
    /// - `controller`: Address holding the halt/resume capability
    /// - `token`: Token accepted on deposit and paid out on withdraw
    /// - `shares`: Beneficiary share table summing to `S_TOTAL`
    /// - `cap`: Lifetime distribution ceiling, `1..=MAX_CAP`
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a second call
    /// - `InvalidCap` if the cap is out of range
    /// - `InvalidShareTable` if the table is empty, oversized, has a zero
    ///   weight, repeats a beneficiary, or does not sum to `S_TOTAL`
    pub fn initialize(
        env: Env,
        controller: Address,
        token: Address,
        shares: Vec<ShareEntry>,
        cap: i128,
    ) -> Result<(), LedgerError> {
        if storage::is_initialized(&env) {
            return Err(LedgerError::AlreadyInitialized);
        }
        controller.require_auth();

        if cap <= 0 || cap > MAX_CAP {
            return Err(LedgerError::InvalidCap);
        }
        if !validate_share_table(&shares) {
            return Err(LedgerError::InvalidShareTable);
        }

        storage::set_controller(&env, &controller);
        storage::set_token(&env, &token);
        storage::set_share_table(&env, &shares);
        storage::set_total_received(&env, 0);
        storage::set_total_released(&env, 0);
        storage::set_cap(&env, cap);
        lifecycle::set_halted(&env, false);

        events::emit_initialized(&env, &controller, &token, cap, shares.len());
        Ok(())
    }

    // ── Funds In / Out ──────────────────────────────────────────────

    /// Record `amount` as received and pull it from `source`.
    ///
    /// Deposits beyond the cap are accepted and recorded; they simply do not
    /// raise the distributable amount. Returns the new lifetime received total.
    ///
    /// # Errors
    /// - `NotInitialized`, `Halted`
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `AmountOverflow` if the received total would overflow
    /// - `TransferFailed` if the token pull fails (nothing is recorded)
    pub fn deposit(env: Env, source: Address, amount: i128) -> Result<i128, LedgerError> {
        storage::require_initialized(&env)?;
        lifecycle::require_active(&env)?;
        if amount <= 0 {
            return Err(LedgerError::NonPositiveAmount);
        }
        source.require_auth();

        let new_total_received = storage::get_total_received(&env)
            .checked_add(amount)
            .ok_or(LedgerError::AmountOverflow)?;
        storage::set_total_received(&env, new_total_received);
        events::emit_deposit_received(&env, &source, amount, new_total_received);

        let token = storage::get_token(&env)?;
        Self::move_funds(&env, &token, &source, &env.current_contract_address(), amount)?;

        Ok(new_total_received)
    }

    /// Pay out everything currently owed to `beneficiary`. Returns the amount.
    ///
    /// Anyone may trigger the payout; funds only ever go to the beneficiary.
    ///
    /// # Process
    /// 1. Computes the pending entitlement
    /// 2. Credits it to the beneficiary's released balance and the total
    /// 3. Emits `Withdrawn`, and `CapReached` if the cap was just exhausted
    /// 4. Transfers the tokens
    ///
    /// # Errors
    /// - `NotInitialized`, `Halted`
    /// - `UnknownBeneficiary` if the address holds no share
    /// - `NothingDue` if the pending entitlement is zero
    /// - `TransferFailed` if the payout transfer fails (state rolled back)
    pub fn withdraw(env: Env, beneficiary: Address) -> Result<i128, LedgerError> {
        storage::require_initialized(&env)?;
        lifecycle::require_active(&env)?;
        let weight =
            storage::get_share(&env, &beneficiary).ok_or(LedgerError::UnknownBeneficiary)?;

        let cap = storage::get_cap(&env);
        let released = storage::get_released(&env, &beneficiary);
        let distributable = entitlement::distributable(storage::get_total_received(&env), cap);
        let amount = entitlement::pending(weight, distributable, released);
        if amount == 0 {
            return Err(LedgerError::NothingDue);
        }

        // Effects
        storage::set_released(&env, &beneficiary, released + amount);
        let new_total_released = storage::get_total_released(&env) + amount;
        storage::set_total_released(&env, new_total_released);
        events::emit_withdrawn(&env, &beneficiary, amount, new_total_released);

        if new_total_released == cap && !storage::is_cap_reached(&env) {
            storage::mark_cap_reached(&env);
            events::emit_cap_reached(&env, cap);
        }

        // Interaction
        let token = storage::get_token(&env)?;
        Self::move_funds(
            &env,
            &token,
            &env.current_contract_address(),
            &beneficiary,
            amount,
        )?;

        Ok(amount)
    }

    // ── Lifecycle Guard ─────────────────────────────────────────────

    /// Halt deposits and withdrawals. Only the controller may call this.
    /// Halting an already halted ledger is a no-op.
    pub fn halt(env: Env, caller: Address) -> Result<(), LedgerError> {
        lifecycle::require_controller(&env, &caller)?;
        if !lifecycle::is_halted(&env) {
            lifecycle::set_halted(&env, true);
            events::emit_halted(&env, &caller);
        }
        Ok(())
    }

    /// Re-enable deposits and withdrawals. Only the controller may call this.
    /// Resuming an active ledger is a no-op.
    pub fn resume(env: Env, caller: Address) -> Result<(), LedgerError> {
        lifecycle::require_controller(&env, &caller)?;
        if lifecycle::is_halted(&env) {
            lifecycle::set_halted(&env, false);
            events::emit_resumed(&env, &caller);
        }
        Ok(())
    }

    /// Hand the lifecycle capability to `new_controller`. Both the current
    /// controller and the new one must authorize.
    pub fn transfer_control(
        env: Env,
        caller: Address,
        new_controller: Address,
    ) -> Result<(), LedgerError> {
        lifecycle::require_controller(&env, &caller)?;
        new_controller.require_auth();
        storage::set_controller(&env, &new_controller);
        events::emit_control_transferred(&env, &caller, &new_controller);
        Ok(())
    }

    pub fn is_halted(env: Env) -> bool {
        lifecycle::is_halted(&env)
    }

    // ── Read-only Queries ───────────────────────────────────────────

    /// Amount `beneficiary` could withdraw right now. Readable while halted.
    pub fn pending_entitlement(env: Env, beneficiary: Address) -> Result<i128, LedgerError> {
        let weight =
            storage::get_share(&env, &beneficiary).ok_or(LedgerError::UnknownBeneficiary)?;
        Ok(Self::pending_for(&env, &beneficiary, weight))
    }

    /// Pending entitlement of every beneficiary, in share table order.
    pub fn pending_all(env: Env) -> Vec<(Address, i128)> {
        let mut out = Vec::new(&env);
        for entry in storage::get_share_table(&env).iter() {
            let pending = Self::pending_for(&env, &entry.beneficiary, entry.weight);
            out.push_back((entry.beneficiary, pending));
        }
        out
    }

    pub fn share_of(env: Env, beneficiary: Address) -> Result<u32, LedgerError> {
        storage::get_share(&env, &beneficiary).ok_or(LedgerError::UnknownBeneficiary)
    }

    /// Amount already paid to `beneficiary` (0 for unknown addresses).
    pub fn released_of(env: Env, beneficiary: Address) -> i128 {
        storage::get_released(&env, &beneficiary)
    }

    pub fn total_received(env: Env) -> i128 {
        storage::get_total_received(&env)
    }

    pub fn total_released(env: Env) -> i128 {
        storage::get_total_released(&env)
    }

    /// `max(0, cap - total_released)`.
    pub fn remaining_cap(env: Env) -> i128 {
        entitlement::remaining_cap(storage::get_cap(&env), storage::get_total_released(&env))
    }

    /// True once the full cap has been paid out.
    pub fn is_retired(env: Env) -> bool {
        storage::is_initialized(&env)
            && storage::get_total_released(&env) == storage::get_cap(&env)
    }

    pub fn get_snapshot(env: Env) -> LedgerSnapshot {
        let cap = storage::get_cap(&env);
        let total_released = storage::get_total_released(&env);
        LedgerSnapshot {
            cap,
            total_received: storage::get_total_received(&env),
            total_released,
            remaining_cap: entitlement::remaining_cap(cap, total_released),
            halted: lifecycle::is_halted(&env),
            retired: storage::is_initialized(&env) && total_released == cap,
        }
    }

    pub fn get_shares(env: Env) -> Vec<ShareEntry> {
        storage::get_share_table(&env)
    }

    pub fn get_cap(env: Env) -> i128 {
        storage::get_cap(&env)
    }

    pub fn get_token(env: Env) -> Result<Address, LedgerError> {
        storage::get_token(&env)
    }

    pub fn get_controller(env: Env) -> Result<Address, LedgerError> {
        storage::get_controller(&env)
    }

    // ── Internal Helpers ────────────────────────────────────────────

    fn pending_for(env: &Env, beneficiary: &Address, weight: u32) -> i128 {
        let distributable = entitlement::distributable(
            storage::get_total_received(env),
            storage::get_cap(env),
        );
        entitlement::pending(weight, distributable, storage::get_released(env, beneficiary))
    }

    /// The ledger's only external interaction. Never retried here.
    fn move_funds(
        env: &Env,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), LedgerError> {
        let client = token::Client::new(env, token);
        match client.try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => {
                log!(env, "token transfer failed", to.clone(), amount);
                Err(LedgerError::TransferFailed)
            }
        }
    }
}
