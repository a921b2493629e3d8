use std::collections::HashMap;

use alloy::primitives::{address, Address};

/// Defaults for a known network. Any field set in the config file wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub rpc_url: &'static str,
    pub explorer: &'static str,
    /// Vesting RewardDistributor, deployed on mainnet only.
    pub vesting_distributor: Option<Address>,
}

/// Registry of known networks
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: HashMap<&'static str, NetworkInfo>,
}

impl NetworkRegistry {
    /// Create a new registry with built-in networks
    pub fn builtin() -> Self {
        let mut networks = HashMap::new();

        networks.insert("galactica-mainnet", NetworkInfo {
            chain_id: 613419,
            rpc_url: "https://galactica-mainnet.g.alchemy.com/public",
            explorer: "https://explorer.galactica.com/",
            vesting_distributor: Some(address!("0x80BCB71F63f11344F5483d108374fa394A587AbE")),
        });

        networks.insert("galactica-cassiopeia", NetworkInfo {
            chain_id: 843843,
            rpc_url: "https://galactica-cassiopeia.g.alchemy.com/public",
            explorer: "https://explorer.galactica.com/",
            vesting_distributor: None,
        });

        Self { networks }
    }

    pub fn get(&self, name: &str) -> Option<&NetworkInfo> {
        self.networks.get(name.trim().to_lowercase().as_str())
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.networks.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let registry = NetworkRegistry::builtin();
        assert_eq!(registry.get("Galactica-Mainnet").map(|n| n.chain_id), Some(613419));
        assert!(registry.get("ethereum-mainnet").is_none());
        assert_eq!(registry.names(), vec!["galactica-cassiopeia", "galactica-mainnet"]);
        assert!(registry.get("galactica-cassiopeia").is_some_and(|n| n.vesting_distributor.is_none()));
    }
}
