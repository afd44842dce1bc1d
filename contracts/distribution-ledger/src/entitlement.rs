//! Pure entitlement arithmetic.
//!
//! `weight <= S_TOTAL` and `distributable <= cap <= MAX_CAP`, so the product
//! below always fits in `i128`.

use fairsplit_common::S_TOTAL;

/// Portion of received funds eligible for distribution.
pub fn distributable(total_received: i128, cap: i128) -> i128 {
    total_received.min(cap).max(0)
}

/// Lifetime amount a weight is entitled to at the given distributable total.
pub fn entitled_total(weight: u32, distributable: i128) -> i128 {
    weight as i128 * distributable / S_TOTAL as i128
}

/// Amount owed and not yet paid. Clamped at zero; a negative value would
/// mean `released` ran ahead of entitlement, which reads must not surface.
pub fn pending(weight: u32, distributable: i128, released: i128) -> i128 {
    (entitled_total(weight, distributable) - released).max(0)
}

/// `max(0, cap - total_released)`.
pub fn remaining_cap(cap: i128, total_released: i128) -> i128 {
    (cap - total_released).max(0)
}
