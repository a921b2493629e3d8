use crate::types::Mode;

/// One transaction of a maintenance sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStep {
    pub ordinal: u8,
    pub function_name: &'static str,
    /// Used as the gas estimate when `eth_estimateGas` cannot simulate the call.
    pub gas_limit_estimate: u64,
    pub description: &'static str,
}

const RESTAKE_SEQUENCE: [TxStep; 2] = [
    TxStep {
        ordinal: 1,
        function_name: "createStake",
        gas_limit_estimate: 120_000,
        description: "createStake with zero value to refresh accrued rewards",
    },
    TxStep {
        ordinal: 2,
        function_name: "addRewardToStake",
        gas_limit_estimate: 150_000,
        description: "addRewardToStake to move accrued rewards into the stake",
    },
];

const LOCK_EXTEND_SEQUENCE: [TxStep; 1] = [TxStep {
    ordinal: 1,
    function_name: "increaseUnlockTime",
    gas_limit_estimate: 200_000,
    description: "increaseUnlockTime to push the lock expiry to its target",
}];

impl Mode {
    /// The compiled-in transaction sequence for this mode, in submission order.
    pub fn steps(&self) -> &'static [TxStep] {
        match self {
            Mode::Restake => &RESTAKE_SEQUENCE,
            Mode::LockExtend => &LOCK_EXTEND_SEQUENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequences_are_ordered_from_one() {
        for mode in [Mode::Restake, Mode::LockExtend] {
            for (i, step) in mode.steps().iter().enumerate() {
                assert_eq!(step.ordinal as usize, i + 1);
            }
        }
        assert_eq!(Mode::Restake.steps()[0].function_name, "createStake");
        assert_eq!(Mode::Restake.steps()[1].function_name, "addRewardToStake");
    }
}
