use alloy::primitives::utils::{format_units, parse_units, UnitsError};
use alloy::primitives::U256;

use crate::types::constant::TOKEN_DECIMALS;

/// Renders a wei amount as a token decimal string, e.g. `5.000000000000000000`.
pub fn format_token(amount: U256) -> String {
    format_units(amount, TOKEN_DECIMALS).unwrap_or_else(|_| amount.to_string())
}

pub fn format_gwei(wei: u128) -> String {
    format_units(U256::from(wei), "gwei").unwrap_or_else(|_| wei.to_string())
}

/// Parses a token decimal string into wei.
pub fn parse_token(value: &str) -> Result<U256, UnitsError> {
    Ok(parse_units(value.trim(), TOKEN_DECIMALS)?.get_absolute())
}

/// Parses a gwei decimal string into wei.
pub fn parse_gwei(value: &str) -> Result<u128, UnitsError> {
    let wei = parse_units(value.trim(), "gwei")?.get_absolute();
    u128::try_from(wei).map_err(|_| UnitsError::InvalidUnit(format!("{value} gwei does not fit in u128")))
}
