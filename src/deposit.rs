use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    rpc::types::TransactionRequest,
};
use tracing::debug;

use crate::{
    bindings::deposit_calldata,
    chain::{NetworkConfig, Registry},
    endpoint::Endpoint,
    error::BridgeError,
};

/// Gas forwarded to the deposit's execution on the rollup.
pub const DESTINATION_GAS_LIMIT: u64 = 200_000;
/// Gas budget of the deposit transaction on the source chain.
pub const DEPOSIT_GAS_LIMIT: u64 = 300_000;

/// One deposit of `amount` wei into the bridge of `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    target: String,
    amount: U256,
}

impl BridgeRequest {
    pub fn new(target: impl Into<String>, amount: U256) -> Result<Self, BridgeError> {
        if amount.is_zero() {
            return Err(BridgeError::InvalidAmount("amount must be positive".to_string()));
        }
        Ok(Self {
            target: target.into(),
            amount,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }
}

/// Builds unsigned deposit transactions that credit the sender on the rollup.
pub struct DepositBuilder<'a> {
    registry: &'a Registry,
    sender: Address,
}

impl<'a> DepositBuilder<'a> {
    pub fn new(registry: &'a Registry, sender: Address) -> Self {
        Self { registry, sender }
    }

    /// Gas price and nonce are read from `endpoint` on every call.
    pub async fn build(
        &self,
        source: &NetworkConfig,
        endpoint: &dyn Endpoint,
        request: &BridgeRequest,
    ) -> Result<TransactionRequest, BridgeError> {
        let target = self.registry.bridgeable_network(request.target())?;
        let gas_price = endpoint.gas_price().await?;
        let nonce = endpoint.transaction_count(self.sender).await?;
        debug!(
            target = %target.config.id,
            contract = %target.contract,
            nonce,
            gas_price = %gas_price,
            "built deposit transaction"
        );

        Ok(TransactionRequest::default()
            .with_from(self.sender)
            .with_to(target.contract)
            .with_value(request.amount())
            .with_input(deposit_calldata(self.sender, DESTINATION_GAS_LIMIT))
            .with_gas_limit(DEPOSIT_GAS_LIMIT)
            .with_gas_price(gas_price)
            .with_nonce(nonce)
            .with_chain_id(source.chain_id))
    }
}
