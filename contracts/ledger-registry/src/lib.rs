//! # Ledger Registry Contract
//!
//! Turns per-project contribution records into a normalized share table and
//! launches a distribution ledger with it. Keeps a project → ledger index so
//! each project gets at most one ledger and each ledger serves one project.

#![no_std]
use fairsplit_common::{aggregate_contributions, normalize_shares, ShareError, MAX_CAP};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, Symbol,
    TryFromVal, Vec,
};

/// Ledger client: WASM import for wasm32, crate for tests.
#[cfg(target_arch = "wasm32")]
mod ledger_import {
    soroban_sdk::contractimport!(
        file = "../../target/wasm32-unknown-unknown/release/fairsplit_distribution_ledger.wasm"
    );
    pub use Client as DistributionLedgerContractClient;
    pub use ShareEntry as LedgerShareEntry;
}
#[cfg(not(target_arch = "wasm32"))]
mod ledger_import {
    pub use fairsplit_distribution_ledger::{
        DistributionLedgerContractClient, ShareEntry as LedgerShareEntry,
    };
}

pub use fairsplit_common::{Contribution, ShareEntry};


pub const TOPIC_LEDGER_LAUNCHED: Symbol = symbol_short!("launched");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum RegistryError {
    EmptyInput = 1,
    NonPositiveAmount = 2,
    DuplicateBeneficiary = 3,
    DegenerateShare = 4,
    InvalidCap = 5,
    InvalidShareTable = 6,
    TooManyBeneficiaries = 7,
    AmountOverflow = 8,
    AlreadyInitialized = 9,
    NotInitialized = 23,
    ProjectExists = 24,
    ProjectNotFound = 25,
    /// Ledger is bound to another project or was initialized elsewhere.
    LedgerInUse = 26,
}

impl From<ShareError> for RegistryError {
    fn from(err: ShareError) -> Self {
        match err {
            ShareError::EmptyInput => RegistryError::EmptyInput,
            ShareError::NonPositiveAmount => RegistryError::NonPositiveAmount,
            ShareError::DuplicateBeneficiary => RegistryError::DuplicateBeneficiary,
            ShareError::DegenerateShare => RegistryError::DegenerateShare,
            ShareError::TooManyBeneficiaries => RegistryError::TooManyBeneficiaries,
            ShareError::AmountOverflow => RegistryError::AmountOverflow,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Admin,
    ProjectCount,
    Project(u64),
    LedgerProject(Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerRecord {
    pub project_id: u64,
    pub ledger: Address,
    pub controller: Address,
    pub token: Address,
    pub cap: i128,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BeneficiaryPosition {
    pub beneficiary: Address,
    pub share: u32,
    pub released: i128,
    pub pending: i128,
}

/// Registry view of a launched ledger, read live from the ledger itself.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectSummary {
    pub project_id: u64,
    pub ledger: Address,
    pub cap: i128,
    pub total_received: i128,
    pub total_released: i128,
    pub remaining_cap: i128,
    pub halted: bool,
    pub positions: Vec<BeneficiaryPosition>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerLaunchedEvent {
    pub project_id: u64,
    pub ledger: Address,
    pub cap: i128,
    pub beneficiary_count: u32,
}

#[contract]
pub struct LedgerRegistryContract;

#[contractimpl]
impl LedgerRegistryContract {
    pub fn initialize(env: Env, admin: Address) -> Result<(), RegistryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(RegistryError::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::ProjectCount, &0u64);
        Ok(())
    }

    /// Normalize `contributions` and initialize `ledger` with the result.
    ///
    /// Duplicate contributors are summed before normalization. The registry
    /// admin assigns project ids, so both the admin and the controller must
    /// authorize. The controller becomes the ledger's controller.
    /// Returns the share table the ledger was initialized with.
    ///
    /// # Errors
    /// - `NotInitialized` before `initialize`
    /// - `ProjectExists` if the project already has a ledger
    /// - `LedgerInUse` if the ledger is bound to another project or refuses
    ///   initialization
    /// - `InvalidCap` if the cap is out of range
    /// - any normalization error (`EmptyInput`, `DegenerateShare`, ...)
    pub fn launch_ledger(
        env: Env,
        project_id: u64,
        ledger: Address,
        controller: Address,
        token: Address,
        contributions: Vec<Contribution>,
        cap: i128,
    ) -> Result<Vec<ShareEntry>, RegistryError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(RegistryError::NotInitialized)?;
        admin.require_auth();
        controller.require_auth();

        if env.storage().instance().has(&DataKey::Project(project_id)) {
            return Err(RegistryError::ProjectExists);
        }
        let ledger_key = DataKey::LedgerProject(ledger.clone());
        if env.storage().instance().has(&ledger_key) {
            return Err(RegistryError::LedgerInUse);
        }
        if cap <= 0 || cap > MAX_CAP {
            return Err(RegistryError::InvalidCap);
        }

        let shares = Self::build_shares(&env, &contributions)?;

        // Same on-chain layout; only the Rust type differs under contractimport
        let ledger_shares = Vec::<ledger_import::LedgerShareEntry>::try_from_val(
            &env,
            &shares.to_val(),
        )
        .map_err(|_| RegistryError::InvalidShareTable)?;
        let client = ledger_import::DistributionLedgerContractClient::new(&env, &ledger);
        match client.try_initialize(&controller, &token, &ledger_shares, &cap) {
            Ok(Ok(())) => {}
            _ => return Err(RegistryError::LedgerInUse),
        }

        let record = LedgerRecord {
            project_id,
            ledger: ledger.clone(),
            controller,
            token,
            cap,
            created_at: env.ledger().timestamp(),
        };
        env.storage()
            .instance()
            .set(&DataKey::Project(project_id), &record);
        env.storage().instance().set(&ledger_key, &project_id);

        let count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::ProjectCount)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::ProjectCount, &(count + 1));

        env.events().publish(
            (TOPIC_LEDGER_LAUNCHED, project_id),
            LedgerLaunchedEvent {
                project_id,
                ledger,
                cap,
                beneficiary_count: shares.len(),
            },
        );

        Ok(shares)
    }

    /// Share table `launch_ledger` would produce, without touching state.
    pub fn preview_shares(
        env: Env,
        contributions: Vec<Contribution>,
    ) -> Result<Vec<ShareEntry>, RegistryError> {
        Self::build_shares(&env, &contributions)
    }

    pub fn get_ledger(env: Env, project_id: u64) -> Option<LedgerRecord> {
        env.storage().instance().get(&DataKey::Project(project_id))
    }

    pub fn get_project_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::ProjectCount)
            .unwrap_or(0)
    }

    pub fn get_admin(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::Admin)
    }

    /// Totals and per-beneficiary positions of a project's ledger.
    pub fn project_summary(env: Env, project_id: u64) -> Result<ProjectSummary, RegistryError> {
        let record: LedgerRecord = env
            .storage()
            .instance()
            .get(&DataKey::Project(project_id))
            .ok_or(RegistryError::ProjectNotFound)?;

        let client = ledger_import::DistributionLedgerContractClient::new(&env, &record.ledger);
        let snapshot = client.get_snapshot();
        let shares = client.get_shares();
        let pending = client.pending_all();

        let mut positions = Vec::new(&env);
        for (entry, (_, owed)) in shares.iter().zip(pending.iter()) {
            positions.push_back(BeneficiaryPosition {
                released: client.released_of(&entry.beneficiary),
                beneficiary: entry.beneficiary,
                share: entry.weight,
                pending: owed,
            });
        }

        Ok(ProjectSummary {
            project_id,
            ledger: record.ledger,
            cap: snapshot.cap,
            total_received: snapshot.total_received,
            total_released: snapshot.total_released,
            remaining_cap: snapshot.remaining_cap,
            halted: snapshot.halted,
            positions,
        })
    }

    fn build_shares(
        env: &Env,
        contributions: &Vec<Contribution>,
    ) -> Result<Vec<ShareEntry>, RegistryError> {
        let aggregated = aggregate_contributions(env, contributions)?;
        normalize_shares(env, &aggregated).map_err(RegistryError::from)
    }
}
