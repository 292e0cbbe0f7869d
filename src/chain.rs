use alloy::primitives::Address;

use crate::error::BridgeError;

/// Static description of one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub id: String,
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
    /// Base URL of a block explorer, used to print transaction links.
    pub explorer: Option<String>,
}

/// A destination rollup whose canonical bridge accepts `depositTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeableNetwork {
    pub config: NetworkConfig,
    pub contract: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Bridgeable(BridgeableNetwork),
    SourceOnly(NetworkConfig),
}

impl Network {
    pub fn config(&self) -> &NetworkConfig {
        match self {
            Network::Bridgeable(network) => &network.config,
            Network::SourceOnly(config) => config,
        }
    }

    pub fn id(&self) -> &str {
        &self.config().id
    }
}

/// Ordered set of networks; insertion order is the bridging order.
#[derive(Debug, Clone)]
pub struct Registry {
    source: usize,
    networks: Vec<Network>,
}

impl Registry {
    pub fn new(source: impl Into<String>, networks: Vec<Network>) -> Result<Self, BridgeError> {
        let source = source.into();
        for (i, network) in networks.iter().enumerate() {
            if networks[..i].iter().any(|n| n.id() == network.id()) {
                return Err(BridgeError::DuplicateNetwork(network.id().to_string()));
            }
        }
        let source = networks
            .iter()
            .position(|n| n.id() == source)
            .ok_or(BridgeError::UnknownNetwork(source))?;
        Ok(Self { source, networks })
    }

    pub fn get(&self, id: &str) -> Result<&NetworkConfig, BridgeError> {
        self.find(id).map(Network::config)
    }

    pub fn bridgeable_network(&self, id: &str) -> Result<&BridgeableNetwork, BridgeError> {
        match self.find(id)? {
            Network::Bridgeable(network) => Ok(network),
            Network::SourceOnly(config) => Err(BridgeError::UnsupportedNetwork(config.id.clone())),
        }
    }

    pub fn list_bridgeable(&self) -> Vec<&BridgeableNetwork> {
        self.networks
            .iter()
            .filter_map(|network| match network {
                Network::Bridgeable(network) => Some(network),
                Network::SourceOnly(_) => None,
            })
            .collect()
    }

    pub fn source(&self) -> &NetworkConfig {
        self.networks[self.source].config()
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.networks.iter().map(Network::config)
    }

    fn find(&self, id: &str) -> Result<&Network, BridgeError> {
        self.networks
            .iter()
            .find(|network| network.id() == id)
            .ok_or_else(|| BridgeError::UnknownNetwork(id.to_string()))
    }
}
