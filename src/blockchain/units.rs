// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-point unit formatting.

use alloy::primitives::U256;

/// Decimals of the native token (wei → ether).
pub const ETHER_DECIMALS: u8 = 18;

/// Format a raw integer amount as a decimal string with `decimals` places.
///
/// Keeps full precision and always renders at least one fractional digit:
/// `1500000000000000000` → `"1.5"`, `10^18` → `"1.0"`, `0` → `"0.0"`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if decimals == 0 {
        return format!("{whole}.0");
    }

    let digits = remainder.to_string();
    let padded = format!(
        "{}{}",
        "0".repeat((decimals as usize).saturating_sub(digits.len())),
        digits
    );
    let trimmed = padded.trim_end_matches('0');
    let fraction = if trimmed.is_empty() { "0" } else { trimmed };

    format!("{whole}.{fraction}")
}

/// Format a wei amount as ether.
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}
