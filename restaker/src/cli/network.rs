use alloy::primitives::Address;
use clap::Args;
use url::Url;

use crate::config::ConfigOverrides;
use crate::types::Mode;

#[derive(Debug, Clone, Args)]
pub struct NetworkCliArgs {
    /// The URL of the JSON-RPC node. Overrides `network.rpc_url`.
    #[arg(env = "RESTAKER_RPC_URL", long)]
    pub rpc_url: Option<Url>,

    /// Address of the staking or escrow contract. Overrides `contract_address`.
    #[arg(env = "RESTAKER_CONTRACT_ADDRESS", long)]
    pub contract_address: Option<Address>,

    /// Overrides the configured mode.
    #[arg(env = "RESTAKER_MODE", long, value_enum)]
    pub mode: Option<Mode>,
}

impl From<&NetworkCliArgs> for ConfigOverrides {
    fn from(args: &NetworkCliArgs) -> Self {
        Self { rpc_url: args.rpc_url.clone(), contract_address: args.contract_address, mode: args.mode }
    }
}
