//! Payout failure and re-entrancy tests.
//!
//! Both use minimal token contracts that only implement `transfer` and keep
//! their own record of what was paid to whom.

use super::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{contracttype, Address, Env, Vec};

#[contracttype]
#[derive(Clone)]
enum MockKey {
    Fail,
    Ledger,
    Paid(Address),
    ReentryAttempts,
    ReentrySucceeded,
}

fn record_payment(env: &Env, to: &Address, amount: i128) {
    let key = MockKey::Paid(to.clone());
    let paid: i128 = env.storage().instance().get(&key).unwrap_or(0);
    env.storage().instance().set(&key, &(paid + amount));
}

fn paid_to(env: &Env, to: &Address) -> i128 {
    env.storage()
        .instance()
        .get(&MockKey::Paid(to.clone()))
        .unwrap_or(0)
}

/// Token whose transfers can be switched to panic.
mod switchable {
    use super::{paid_to, record_payment, MockKey};
    use soroban_sdk::{contract, contractimpl, Address, Env};

    #[contract]
    pub struct SwitchableToken;

    #[contractimpl]
    impl SwitchableToken {
        pub fn set_fail(env: Env, fail: bool) {
            env.storage().instance().set(&MockKey::Fail, &fail);
        }

        pub fn transfer(env: Env, _from: Address, to: Address, amount: i128) {
            let fail: bool = env
                .storage()
                .instance()
                .get(&MockKey::Fail)
                .unwrap_or(false);
            if fail {
                panic!("transfer rejected");
            }
            record_payment(&env, &to, amount);
        }

        pub fn paid(env: Env, to: Address) -> i128 {
            paid_to(&env, &to)
        }
    }
}

/// Token that calls back into the ledger's `withdraw` while paying out.
mod reentrant {
    use super::{paid_to, record_payment, MockKey};
    use crate::DistributionLedgerContractClient;
    use soroban_sdk::{contract, contractimpl, Address, Env};

    #[contract]
    pub struct ReentrantToken;

    #[contractimpl]
    impl ReentrantToken {
        pub fn arm(env: Env, ledger: Address) {
            env.storage().instance().set(&MockKey::Ledger, &ledger);
        }

        pub fn transfer(env: Env, _from: Address, to: Address, amount: i128) {
            record_payment(&env, &to, amount);

            let ledger: Option<Address> = env.storage().instance().get(&MockKey::Ledger);
            if let Some(ledger) = ledger {
                if to == ledger {
                    return;
                }
                let attempts: u32 = env
                    .storage()
                    .instance()
                    .get(&MockKey::ReentryAttempts)
                    .unwrap_or(0);
                env.storage()
                    .instance()
                    .set(&MockKey::ReentryAttempts, &(attempts + 1));

                let client = DistributionLedgerContractClient::new(&env, &ledger);
                if let Ok(Ok(_)) = client.try_withdraw(&to) {
                    env.storage()
                        .instance()
                        .set(&MockKey::ReentrySucceeded, &true);
                }
            }
        }

        pub fn paid(env: Env, to: Address) -> i128 {
            paid_to(&env, &to)
        }

        pub fn reentry_attempts(env: Env) -> u32 {
            env.storage()
                .instance()
                .get(&MockKey::ReentryAttempts)
                .unwrap_or(0)
        }

        pub fn reentry_succeeded(env: Env) -> bool {
            env.storage()
                .instance()
                .get(&MockKey::ReentrySucceeded)
                .unwrap_or(false)
        }
    }
}

use reentrant::{ReentrantToken, ReentrantTokenClient};
use switchable::{SwitchableToken, SwitchableTokenClient};

fn ledger_with_token(
    env: &Env,
    token: &Address,
    weights: &[u32],
    cap: i128,
) -> (DistributionLedgerContractClient<'static>, Vec<Address>) {
    let contract_id = env.register(DistributionLedgerContract, ());
    let client = DistributionLedgerContractClient::new(env, &contract_id);

    let mut shares = Vec::new(env);
    let mut beneficiaries = Vec::new(env);
    for weight in weights {
        let b = Address::generate(env);
        shares.push_back(ShareEntry {
            beneficiary: b.clone(),
            weight: *weight,
        });
        beneficiaries.push_back(b);
    }
    client.initialize(&Address::generate(env), token, &shares, &cap);
    (client, beneficiaries)
}

// ════════════════════════════════════════════════════════════════════
//  Transfer Failure
// ════════════════════════════════════════════════════════════════════

#[test]
fn test_failed_payout_rolls_back_everything() {
    let env = Env::default();
    env.mock_all_auths();
    let token_id = env.register(SwitchableToken, ());
    let token = SwitchableTokenClient::new(&env, &token_id);
    let (ledger, beneficiaries) = ledger_with_token(&env, &token_id, &[7000, 3000], 1000);
    let a = beneficiaries.get(0).unwrap();

    ledger.deposit(&Address::generate(&env), &1000);
    let before = ledger.get_snapshot();

    token.set_fail(&true);
    assert_eq!(
        ledger.try_withdraw(&a),
        Err(Ok(LedgerError::TransferFailed))
    );

    assert_eq!(ledger.get_snapshot(), before);
    assert_eq!(ledger.released_of(&a), 0);
    assert_eq!(ledger.pending_entitlement(&a), 700);
    assert_eq!(token.paid(&a), 0);

    // Same call succeeds once the token recovers
    token.set_fail(&false);
    assert_eq!(ledger.withdraw(&a), 700);
    assert_eq!(token.paid(&a), 700);
}

#[test]
fn test_failed_payout_does_not_consume_cap_event() {
    let env = Env::default();
    env.mock_all_auths();
    let token_id = env.register(SwitchableToken, ());
    let token = SwitchableTokenClient::new(&env, &token_id);
    let (ledger, beneficiaries) = ledger_with_token(&env, &token_id, &[10_000], 500);
    let only = beneficiaries.get(0).unwrap();

    ledger.deposit(&Address::generate(&env), &500);

    token.set_fail(&true);
    assert_eq!(
        ledger.try_withdraw(&only),
        Err(Ok(LedgerError::TransferFailed))
    );
    assert!(!ledger.is_retired());
    assert_eq!(ledger.remaining_cap(), 500);

    token.set_fail(&false);
    assert_eq!(ledger.withdraw(&only), 500);
    assert!(ledger.is_retired());
}

#[test]
fn test_failed_deposit_pull_records_nothing() {
    let env = Env::default();
    env.mock_all_auths();
    let token_id = env.register(SwitchableToken, ());
    let token = SwitchableTokenClient::new(&env, &token_id);
    let (ledger, _beneficiaries) = ledger_with_token(&env, &token_id, &[10_000], 500);

    token.set_fail(&true);
    assert_eq!(
        ledger.try_deposit(&Address::generate(&env), &200),
        Err(Ok(LedgerError::TransferFailed))
    );
    assert_eq!(ledger.total_received(), 0);
}

#[test]
fn test_transfer_failure_is_retryable_and_validation_is_not() {
    assert!(LedgerError::TransferFailed.is_retryable());
    assert!(LedgerError::Halted.is_retryable());
    assert!(LedgerError::NothingDue.is_retryable());
    assert!(!LedgerError::InvalidCap.is_retryable());
    assert!(!LedgerError::NonPositiveAmount.is_retryable());

    assert_eq!(LedgerError::InvalidShareTable.class(), ErrorClass::Validation);
    assert_eq!(LedgerError::UnknownBeneficiary.class(), ErrorClass::StateConflict);
    assert_eq!(LedgerError::TransferFailed.class(), ErrorClass::Transfer);
}

// ════════════════════════════════════════════════════════════════════
//  Re-entrancy
// ════════════════════════════════════════════════════════════════════

#[test]
fn test_reentrant_withdraw_cannot_double_pay() {
    let env = Env::default();
    env.mock_all_auths();
    let token_id = env.register(ReentrantToken, ());
    let token = ReentrantTokenClient::new(&env, &token_id);
    let (ledger, beneficiaries) = ledger_with_token(&env, &token_id, &[5000, 5000], 1000);
    let a = beneficiaries.get(0).unwrap();

    ledger.deposit(&Address::generate(&env), &300);
    token.arm(&ledger.address);

    // The nested withdraw is rejected by the host; the outer one completes
    assert_eq!(ledger.try_withdraw(&a), Ok(Ok(150)));
    assert_eq!(token.reentry_attempts(), 1);
    assert!(!token.reentry_succeeded());

    assert_eq!(token.paid(&a), 150);
    assert_eq!(ledger.released_of(&a), 150);
    assert_eq!(ledger.total_released(), 150);
    assert_eq!(ledger.pending_entitlement(&a), 0);
    assert_eq!(ledger.pending_entitlement(&beneficiaries.get(1).unwrap()), 150);
}
