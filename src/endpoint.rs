use std::{collections::HashMap, marker::PhantomData, sync::Arc};

use alloy::{
    network::Ethereum,
    primitives::{Address, TxHash, U256},
    providers::{Provider, ProviderBuilder},
    transports::{http::reqwest::Url, Transport},
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::{chain::Registry, error::BridgeError};

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("invalid rpc url for {network}: {reason}")]
    InvalidUrl { network: String, reason: String },
    #[error("{network}: {call} failed: {reason}")]
    Rpc {
        network: String,
        call: &'static str,
        reason: String,
    },
}

/// Read/write access to one chain.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn balance(&self, address: Address) -> Result<U256, EndpointError>;

    async fn gas_price(&self) -> Result<u128, EndpointError>;

    async fn transaction_count(&self, address: Address) -> Result<u64, EndpointError>;

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, EndpointError>;
}

pub struct RpcEndpoint<P, T> {
    network: String,
    provider: P,
    _phantom: PhantomData<T>,
}

impl<P, T> RpcEndpoint<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    pub fn new(network: impl Into<String>, provider: P) -> Self {
        Self {
            network: network.into(),
            provider,
            _phantom: PhantomData,
        }
    }

    fn rpc_error(&self, call: &'static str, err: impl ToString) -> EndpointError {
        EndpointError::Rpc {
            network: self.network.clone(),
            call,
            reason: err.to_string(),
        }
    }
}

/// Connects an HTTP endpoint; nothing is sent until the first call.
pub fn connect_http(network: &str, rpc_url: &str) -> Result<Arc<dyn Endpoint>, EndpointError> {
    let url = Url::parse(rpc_url).map_err(|err| EndpointError::InvalidUrl {
        network: network.to_string(),
        reason: err.to_string(),
    })?;
    let provider = ProviderBuilder::new().on_http(url);
    Ok(Arc::new(RpcEndpoint::new(network, provider)))
}

#[async_trait]
impl<P, T> Endpoint for RpcEndpoint<P, T>
where
    P: Provider<T, Ethereum> + 'static,
    T: Transport + Clone,
{
    async fn balance(&self, address: Address) -> Result<U256, EndpointError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|err| self.rpc_error("eth_getBalance", err))
    }

    async fn gas_price(&self) -> Result<u128, EndpointError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|err| self.rpc_error("eth_gasPrice", err))
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, EndpointError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|err| self.rpc_error("eth_getTransactionCount", err))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, EndpointError> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|err| self.rpc_error("eth_sendRawTransaction", err))?;
        debug!(network = %self.network, tx = %pending.tx_hash(), "raw transaction accepted");
        Ok(*pending.tx_hash())
    }
}

/// Endpoint per network id.
#[derive(Clone, Default)]
pub struct Connections {
    endpoints: HashMap<String, Arc<dyn Endpoint>>,
}

impl Connections {
    pub fn connect(registry: &Registry) -> Result<Self, EndpointError> {
        let mut connections = Self::default();
        for config in registry.networks() {
            connections.insert(&config.id, connect_http(&config.id, &config.rpc_url)?);
        }
        Ok(connections)
    }

    pub fn insert(&mut self, network: &str, endpoint: Arc<dyn Endpoint>) {
        self.endpoints.insert(network.to_string(), endpoint);
    }

    pub fn get(&self, network: &str) -> Result<&dyn Endpoint, BridgeError> {
        self.endpoints
            .get(network)
            .map(|endpoint| endpoint.as_ref())
            .ok_or_else(|| BridgeError::UnknownNetwork(network.to_string()))
    }
}
