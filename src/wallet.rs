use std::{fmt, str::FromStr};

use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use tracing::warn;

use crate::{endpoint::Endpoint, error::BridgeError};

/// Result of a balance lookup. A failed lookup is kept apart from an empty account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    Known(U256),
    Unavailable,
}

impl Balance {
    pub fn or_zero(self) -> U256 {
        match self {
            Balance::Known(wei) => wei,
            Balance::Unavailable => U256::ZERO,
        }
    }
}

pub struct Wallet {
    address: Address,
    signer: EthereumWallet,
}

impl Wallet {
    pub fn from_private_key(private_key: &str) -> Result<Self, BridgeError> {
        let signer = PrivateKeySigner::from_str(private_key.trim())
            .map_err(|err| BridgeError::Signing(format!("malformed private key: {err}")))?;
        Ok(Self {
            address: signer.address(),
            signer: EthereumWallet::from(signer),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Never fails: lookup errors are logged and reported as [`Balance::Unavailable`].
    pub async fn balance_of(&self, endpoint: &dyn Endpoint) -> Balance {
        match endpoint.balance(self.address).await {
            Ok(wei) => Balance::Known(wei),
            Err(err) => {
                warn!("balance lookup failed: {err}");
                Balance::Unavailable
            }
        }
    }

    /// Signs `tx` and returns its EIP-2718 encoding, ready for broadcast.
    pub async fn sign(&self, tx: TransactionRequest) -> Result<Bytes, BridgeError> {
        let envelope = tx
            .with_from(self.address)
            .build(&self.signer)
            .await
            .map_err(|err| BridgeError::Signing(err.to_string()))?;
        Ok(envelope.encoded_2718().into())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("private_key", &"<hidden>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockEndpoint, ANVIL_ADDRESS, ANVIL_KEY};
    use alloy::{consensus::TxEnvelope, eips::eip2718::Decodable2718, primitives::TxKind};

    #[test]
    fn address_is_derived_from_key() {
        let wallet = Wallet::from_private_key(ANVIL_KEY).unwrap();
        assert_eq!(wallet.address(), ANVIL_ADDRESS);

        let again = Wallet::from_private_key(&format!("0x{ANVIL_KEY}")).unwrap();
        assert_eq!(again.address(), wallet.address());
    }

    #[test]
    fn malformed_key_is_a_signing_error() {
        assert!(matches!(
            Wallet::from_private_key("not-a-key"),
            Err(BridgeError::Signing(_))
        ));
        assert!(matches!(
            Wallet::from_private_key(""),
            Err(BridgeError::Signing(_))
        ));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let wallet = Wallet::from_private_key(ANVIL_KEY).unwrap();
        let debug = format!("{wallet:?}");
        assert!(debug.contains("<hidden>"));
        assert!(!debug.contains(ANVIL_KEY));
    }

    #[tokio::test]
    async fn balance_lookup_failure_is_unavailable() {
        let wallet = Wallet::from_private_key(ANVIL_KEY).unwrap();

        let funded = MockEndpoint::with_balance(U256::from(42));
        assert_eq!(wallet.balance_of(&funded).await, Balance::Known(U256::from(42)));

        let broken = MockEndpoint::unreachable();
        let balance = wallet.balance_of(&broken).await;
        assert_eq!(balance, Balance::Unavailable);
        assert_eq!(balance.or_zero(), U256::ZERO);
    }

    #[tokio::test]
    async fn signs_legacy_transaction() {
        let wallet = Wallet::from_private_key(ANVIL_KEY).unwrap();
        let tx = TransactionRequest::default()
            .with_to(Address::repeat_byte(0x0b))
            .with_value(U256::from(1_000))
            .with_gas_limit(300_000)
            .with_gas_price(1_000_000_000)
            .with_nonce(7)
            .with_chain_id(1);

        let raw = wallet.sign(tx).await.unwrap();
        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
        let TxEnvelope::Legacy(signed) = envelope else {
            panic!("expected a legacy transaction");
        };

        assert_eq!(signed.tx().chain_id, Some(1));
        assert_eq!(signed.tx().nonce, 7);
        assert_eq!(signed.tx().to, TxKind::Call(Address::repeat_byte(0x0b)));
    }
}
