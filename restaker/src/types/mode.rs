use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::constant::{DEFAULT_HISTORY_FILE, DEFAULT_LOCK_HISTORY_FILE};

/// Which maintenance sequence the agent runs against its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Move accrued rewards back into the stake.
    Restake,
    /// Push the VotingEscrow lock expiry out to its target.
    LockExtend,
}

impl Mode {
    /// History file used when the config names none. Rows carry no mode, so each mode keeps its own.
    pub fn default_history_file(&self) -> &'static str {
        match self {
            Mode::Restake => DEFAULT_HISTORY_FILE,
            Mode::LockExtend => DEFAULT_LOCK_HISTORY_FILE,
        }
    }
}
