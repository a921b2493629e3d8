use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface StakingContract {
        function createStake() external payable;
        function addRewardToStake(address user) external;
        function showPendingReward(address account) external view returns (uint256);
        function getStake(address user) external view returns (uint256);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface VotingEscrow {
        function MAXTIME() external view returns (uint256);
        function locked(address addr) external view returns (uint256);
        function lockEnd(address addr) external view returns (uint256);
        function increaseUnlockTime(uint256 newUnlockTime) external;
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface RewardDistributor {
        function currentEpoch() external view returns (uint256);
        function userLastClaimedEpoch(address user) external view returns (uint256);
    }
}
