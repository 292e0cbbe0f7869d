use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use alloy::{
    consensus::TxEnvelope,
    eips::eip2718::Decodable2718,
    primitives::{address, keccak256, Address, TxHash, U256},
};
use async_trait::async_trait;
use tokio::time::Instant;

use crate::endpoint::{Endpoint, EndpointError};

/// First anvil dev account.
pub const ANVIL_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ANVIL_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const GAS_PRICE: u128 = 2_000_000_000;

#[derive(Debug, Clone)]
pub struct Submission {
    pub to: Option<Address>,
    pub value: U256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub at: Instant,
}

#[derive(Default)]
struct State {
    submissions: Vec<Submission>,
    rejected_targets: HashSet<Address>,
}

/// In-memory chain: answers reads from fixed values and records broadcasts.
#[derive(Clone)]
pub struct MockEndpoint {
    balance: Option<U256>,
    state: Arc<Mutex<State>>,
}

impl MockEndpoint {
    pub fn with_balance(balance: U256) -> Self {
        Self {
            balance: Some(balance),
            state: Arc::default(),
        }
    }

    /// Every call fails as if the node could not be reached.
    pub fn unreachable() -> Self {
        Self {
            balance: None,
            state: Arc::default(),
        }
    }

    /// Broadcasts sent to `contract` are rejected.
    pub fn reject_deposits_to(self, contract: Address) -> Self {
        self.state.lock().unwrap().rejected_targets.insert(contract);
        self
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().unwrap().submissions.clone()
    }

    fn unavailable(call: &'static str) -> EndpointError {
        EndpointError::Rpc {
            network: "mock".to_string(),
            call,
            reason: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl Endpoint for MockEndpoint {
    async fn balance(&self, _address: Address) -> Result<U256, EndpointError> {
        self.balance.ok_or_else(|| Self::unavailable("eth_getBalance"))
    }

    async fn gas_price(&self) -> Result<u128, EndpointError> {
        self.balance
            .map(|_| GAS_PRICE)
            .ok_or_else(|| Self::unavailable("eth_gasPrice"))
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, EndpointError> {
        self.balance
            .ok_or_else(|| Self::unavailable("eth_getTransactionCount"))?;
        Ok(self.state.lock().unwrap().submissions.len() as u64)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, EndpointError> {
        let envelope = TxEnvelope::decode_2718(&mut &raw[..]).map_err(|err| EndpointError::Rpc {
            network: "mock".to_string(),
            call: "eth_sendRawTransaction",
            reason: err.to_string(),
        })?;
        let TxEnvelope::Legacy(signed) = envelope else {
            panic!("deposits are sent as legacy transactions");
        };
        let tx = signed.tx();
        let to = tx.to.to().copied();

        let mut state = self.state.lock().unwrap();
        if to.is_some_and(|to| state.rejected_targets.contains(&to)) {
            return Err(EndpointError::Rpc {
                network: "mock".to_string(),
                call: "eth_sendRawTransaction",
                reason: "replacement transaction underpriced".to_string(),
            });
        }
        state.submissions.push(Submission {
            to,
            value: tx.value,
            nonce: tx.nonce,
            gas_limit: tx.gas_limit,
            gas_price: tx.gas_price,
            at: Instant::now(),
        });
        Ok(keccak256(raw))
    }
}
