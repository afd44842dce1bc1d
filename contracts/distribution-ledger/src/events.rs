//! # Structured Event Emissions for the Distribution Ledger
//!
//! | Event             | Topic       | Emitted when                               |
//! |-------------------|-------------|--------------------------------------------|
//! | Initialized       | `init`      | The share table and cap are committed      |
//! | DepositReceived   | `deposit`   | Funds are recorded as received             |
//! | Withdrawn         | `withdrawn` | A beneficiary's entitlement is released    |
//! | CapReached        | `cap_reach` | Total released first equals the cap (once) |
//! | Halted / Resumed  | `halted` / `resumed` | The lifecycle switch flips        |
//! | ControlTransferred | `ctrl_xfer` | The lifecycle capability changes hands    |
//!
//! Deposit and withdrawal events carry the acting address as a second topic
//! so indexers can filter per account.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ════════════════════════════════════════════════════════════════════
//  Event Topics
// ════════════════════════════════════════════════════════════════════

pub const TOPIC_INITIALIZED: Symbol = symbol_short!("init");
pub const TOPIC_DEPOSIT_RECEIVED: Symbol = symbol_short!("deposit");
pub const TOPIC_WITHDRAWN: Symbol = symbol_short!("withdrawn");
pub const TOPIC_CAP_REACHED: Symbol = symbol_short!("cap_reach");
pub const TOPIC_HALTED: Symbol = symbol_short!("halted");
pub const TOPIC_RESUMED: Symbol = symbol_short!("resumed");
pub const TOPIC_CONTROL_TRANSFERRED: Symbol = symbol_short!("ctrl_xfer");

// ════════════════════════════════════════════════════════════════════
//  Event Data Structures
// ════════════════════════════════════════════════════════════════════

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub controller: Address,
    pub token: Address,
    pub cap: i128,
    pub beneficiary_count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositReceivedEvent {
    /// Address the funds were pulled from
    pub source: Address,
    pub amount: i128,
    /// Lifetime received total after this deposit
    pub new_total_received: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub beneficiary: Address,
    pub amount: i128,
    /// Lifetime released total after this withdrawal
    pub new_total_released: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapReachedEvent {
    pub cap: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LifecycleChangedEvent {
    pub changed_by: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControlTransferredEvent {
    pub previous: Address,
    pub new_controller: Address,
}

// ════════════════════════════════════════════════════════════════════
//  Event Emission Functions
// ════════════════════════════════════════════════════════════════════

pub fn emit_initialized(
    env: &Env,
    controller: &Address,
    token: &Address,
    cap: i128,
    beneficiary_count: u32,
) {
    let event = InitializedEvent {
        controller: controller.clone(),
        token: token.clone(),
        cap,
        beneficiary_count,
    };
    env.events().publish((TOPIC_INITIALIZED,), event);
}

pub fn emit_deposit_received(env: &Env, source: &Address, amount: i128, new_total_received: i128) {
    let event = DepositReceivedEvent {
        source: source.clone(),
        amount,
        new_total_received,
    };
    env.events()
        .publish((TOPIC_DEPOSIT_RECEIVED, source.clone()), event);
}

pub fn emit_withdrawn(env: &Env, beneficiary: &Address, amount: i128, new_total_released: i128) {
    let event = WithdrawnEvent {
        beneficiary: beneficiary.clone(),
        amount,
        new_total_released,
    };
    env.events()
        .publish((TOPIC_WITHDRAWN, beneficiary.clone()), event);
}

/// Emitted exactly once per ledger, on the withdrawal that exhausts the cap.
pub fn emit_cap_reached(env: &Env, cap: i128) {
    env.events()
        .publish((TOPIC_CAP_REACHED,), CapReachedEvent { cap });
}

pub fn emit_halted(env: &Env, changed_by: &Address) {
    let event = LifecycleChangedEvent {
        changed_by: changed_by.clone(),
    };
    env.events().publish((TOPIC_HALTED,), event);
}

pub fn emit_resumed(env: &Env, changed_by: &Address) {
    let event = LifecycleChangedEvent {
        changed_by: changed_by.clone(),
    };
    env.events().publish((TOPIC_RESUMED,), event);
}

pub fn emit_control_transferred(env: &Env, previous: &Address, new_controller: &Address) {
    let event = ControlTransferredEvent {
        previous: previous.clone(),
        new_controller: new_controller.clone(),
    };
    env.events().publish((TOPIC_CONTROL_TRANSFERRED,), event);
}
