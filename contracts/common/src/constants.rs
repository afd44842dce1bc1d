//! Protocol-wide constants shared by the ledger and the registry.

/// Total share weight of a valid share table, in basis points (100%).
pub const S_TOTAL: u32 = 10_000;

/// Upper bound on beneficiaries per ledger. Keeps the share table small
/// enough for instance storage and keeps `pending_all` bounded.
pub const MAX_BENEFICIARIES: u32 = 50;

/// Largest cap a ledger accepts. `weight * distributable` is computed in
/// `i128` with `weight <= S_TOTAL` and `distributable <= cap`, so this bound
/// keeps entitlement math free of overflow.
pub const MAX_CAP: i128 = i128::MAX / S_TOTAL as i128;
