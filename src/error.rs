use alloy::primitives::U256;
use thiserror::Error;

use crate::endpoint::EndpointError;
use crate::units::format_ether;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    #[error("network {0} has no bridge contract configured")]
    UnsupportedNetwork(String),
    #[error("duplicate network id: {0}")]
    DuplicateNetwork(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error(
        "insufficient balance: required {} ETH, available {} ETH",
        format_ether(*required),
        format_ether(*available)
    )]
    InsufficientBalance { required: U256, available: U256 },
    #[error(transparent)]
    EndpointUnavailable(#[from] EndpointError),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("submission rejected: {0}")]
    Submission(String),
}
