use std::{str::FromStr, time::Duration};

use alloy::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};

use crate::{
    chain::{BridgeableNetwork, Network, NetworkConfig, Registry},
    error::BridgeError,
    units::parse_amount,
};

pub const SOURCE_NETWORK: &str = "ethereum";

#[derive(Parser)]
#[command(
    name = "superbridge",
    version,
    about = "Deposit ETH from Ethereum into several OP-stack rollups, one after another"
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu (default)
    Menu,
    /// Bridge the same amount to every bridgeable network
    All {
        /// ETH per network
        #[arg(long, value_parser = parse_amount)]
        amount: Option<U256>,
        /// Seconds to wait between networks
        #[arg(long)]
        delay: Option<u64>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Bridge to a single network
    Bridge {
        network: String,
        /// ETH to deposit
        #[arg(long, value_parser = parse_amount)]
        amount: Option<U256>,
    },
    /// Show wallet balances on every network
    Balances,
}

/// Process-wide settings; every field can come from the environment or a `.env` file.
#[derive(Args)]
pub struct Settings {
    /// Hex-encoded key of the bridging wallet
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    #[arg(long, env = "ETHEREUM_RPC", default_value = "https://eth.llamarpc.com")]
    pub ethereum_rpc: String,

    #[arg(long, env = "OPTIMISM_RPC", default_value = "https://mainnet.optimism.io")]
    pub optimism_rpc: String,

    #[arg(long, env = "BASE_RPC", default_value = "https://mainnet.base.org")]
    pub base_rpc: String,

    #[arg(long, env = "UNICHAIN_RPC", default_value = "https://rpc.unichain.org")]
    pub unichain_rpc: String,

    #[arg(long, env = "INKCHAIN_RPC", default_value = "https://rpc-gel.inkonchain.com")]
    pub inkchain_rpc: String,

    #[arg(
        long,
        env = "OPTIMISM_BRIDGE_CONTRACT",
        default_value = "0x99C9fc46f92E8a1c0deC1b1747d010903E884bE1"
    )]
    pub optimism_bridge: Address,

    #[arg(
        long,
        env = "BASE_BRIDGE_CONTRACT",
        default_value = "0x3154Cf16ccdb4C6d922629664174b904d80F2C35"
    )]
    pub base_bridge: Address,

    /// Unichain stays source-only until a bridge contract is set
    #[arg(
        long,
        env = "UNICHAIN_BRIDGE_CONTRACT",
        default_value = "",
        hide_default_value = true,
        value_parser = parse_optional_contract
    )]
    pub unichain_bridge: OptionalContract,

    /// Inkchain stays source-only until a bridge contract is set
    #[arg(
        long,
        env = "INKCHAIN_BRIDGE_CONTRACT",
        default_value = "",
        hide_default_value = true,
        value_parser = parse_optional_contract
    )]
    pub inkchain_bridge: OptionalContract,

    /// Default ETH per network
    #[arg(long, env = "BRIDGE_AMOUNT", default_value = "0.01", value_parser = parse_amount)]
    pub amount: U256,

    /// Default seconds between networks
    #[arg(long, env = "DELAY_SECONDS", default_value_t = 30)]
    pub delay_seconds: u64,
}

/// Bridge contract setting where a blank value, as left by an empty `.env` entry, means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionalContract(pub Option<Address>);

fn parse_optional_contract(value: &str) -> Result<OptionalContract, String> {
    match value.trim() {
        "" => Ok(OptionalContract(None)),
        address => Address::from_str(address)
            .map(|address| OptionalContract(Some(address)))
            .map_err(|err| err.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeDefaults {
    pub amount: U256,
    pub delay: Duration,
}

impl Settings {
    pub fn defaults(&self) -> BridgeDefaults {
        BridgeDefaults {
            amount: self.amount,
            delay: Duration::from_secs(self.delay_seconds),
        }
    }

    /// Networks in bridging order, Ethereum first as the source.
    pub fn registry(&self) -> Result<Registry, BridgeError> {
        let networks = vec![
            Network::SourceOnly(NetworkConfig {
                id: SOURCE_NETWORK.to_string(),
                name: "Ethereum".to_string(),
                rpc_url: self.ethereum_rpc.clone(),
                chain_id: 1,
                explorer: Some("https://etherscan.io".to_string()),
            }),
            network("optimism", "OP Mainnet", &self.optimism_rpc, 10, Some(self.optimism_bridge)),
            network("base", "Base", &self.base_rpc, 8453, Some(self.base_bridge)),
            network("unichain", "Unichain", &self.unichain_rpc, 1301, self.unichain_bridge.0),
            network("inkchain", "Inkchain", &self.inkchain_rpc, 57073, self.inkchain_bridge.0),
        ];
        Registry::new(SOURCE_NETWORK, networks)
    }
}

fn network(id: &str, name: &str, rpc_url: &str, chain_id: u64, contract: Option<Address>) -> Network {
    let config = NetworkConfig {
        id: id.to_string(),
        name: name.to_string(),
        rpc_url: rpc_url.to_string(),
        chain_id,
        explorer: None,
    };
    match contract {
        Some(contract) => Network::Bridgeable(BridgeableNetwork { config, contract }),
        None => Network::SourceOnly(config),
    }
}
