/// anvil account #0
pub const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ANVIL_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub const TEST_CHAIN_ID: u64 = 613419;
pub const CONTRACT_ADDRESS: &str = "0x90B07E15Cfb173726de904ca548dd96f73c12428";
pub const VESTING_DISTRIBUTOR: &str = "0x80BCB71F63f11344F5483d108374fa394A587AbE";

/// Thursday 2024-01-04 00:00:00 UTC, a week boundary.
pub const NOW: u64 = 1_704_326_400;
/// Four years, the usual escrow maximum.
pub const MAX_TIME: u64 = 4 * 365 * 86_400;

pub const RECEIPT_GAS_USED: u64 = 90_000;
pub const RECEIPT_GAS_PRICE_GWEI: u64 = 30;
