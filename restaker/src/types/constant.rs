/// VotingEscrow rounds every unlock time down to a week boundary.
pub const WEEK_SECS: u64 = 7 * 86_400;

pub const DAY_SECS: u64 = 86_400;

/// Token decimals of the staked asset (and of the native gas token).
pub const TOKEN_DECIMALS: u8 = 18;

/// Fixed headroom added on top of the scaled gas estimate.
pub const GAS_LIMIT_BUFFER: u64 = 20_000;

pub const DEFAULT_GAS_LIMIT_MULTIPLIER: f64 = 1.25;

pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_RECEIPT_POLL_INTERVAL_SECS: u64 = 3;

pub const DEFAULT_HISTORY_FILE: &str = "data/history.csv";

pub const DEFAULT_LOCK_HISTORY_FILE: &str = "data/lock-history.csv";

/// Column order of the history file. Consumers rely on it, never reorder.
pub const HISTORY_COLUMNS: [&str; 6] = ["timestamp", "status", "amount", "gas_cost", "tx_hash_1", "tx_hash_2"];
