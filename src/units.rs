use alloy::primitives::{utils::parse_ether, U256};

const WEI_PER_MICRO_ETHER: u64 = 1_000_000_000_000;
const MICRO_PER_ETHER: u64 = 1_000_000;

/// Parses a decimal ether quantity such as `0.02` into wei.
pub fn parse_amount(input: &str) -> Result<U256, String> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(format!("amount must not be negative: {input}"));
    }
    parse_ether(input).map_err(|err| format!("cannot parse {input:?} as ETH: {err}"))
}

/// Formats wei as ether rounded to 6 decimal places.
pub fn format_ether(wei: U256) -> String {
    let step = U256::from(WEI_PER_MICRO_ETHER);
    let micro = wei.saturating_add(step / U256::from(2)) / step;
    let whole = micro / U256::from(MICRO_PER_ETHER);
    let frac = (micro % U256::from(MICRO_PER_ETHER)).to::<u64>();
    format!("{whole}.{frac:06}")
}
