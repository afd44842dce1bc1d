use soroban_sdk::{contracttype, Address};

/// Raw contribution record supplied by the surrounding system.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contribution {
    /// Account credited with the contribution
    pub beneficiary: Address,
    /// Contribution amount in any consistent unit (must be positive)
    pub amount: i128,
}

/// One row of a beneficiary share table.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareEntry {
    /// Recipient address
    pub beneficiary: Address,
    /// Share weight in basis points (1..=S_TOTAL)
    pub weight: u32,
}
