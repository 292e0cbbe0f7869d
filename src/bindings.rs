use alloy::{
    primitives::{Address, Bytes},
    sol,
    sol_types::SolCall,
};

sol! {
    #[allow(missing_docs)]
    contract OptimismPortal {
        function depositTransaction(address to, uint64 gasLimit, bytes data) external payable;
    }
}

/// Calldata for a plain value deposit: no L2 call, just `recipient` credited on the rollup.
pub fn deposit_calldata(recipient: Address, gas_limit: u64) -> Bytes {
    OptimismPortal::depositTransactionCall {
        to: recipient,
        gasLimit: gas_limit,
        data: Bytes::new(),
    }
    .abi_encode()
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calldata_starts_with_deposit_selector() {
        let data = deposit_calldata(Address::repeat_byte(0x11), 200_000);
        assert_eq!(
            &data[..4],
            OptimismPortal::depositTransactionCall::SELECTOR.as_slice()
        );
        assert_eq!(
            OptimismPortal::depositTransactionCall::SIGNATURE,
            "depositTransaction(address,uint64,bytes)"
        );
    }

    #[test]
    fn calldata_decodes_back_to_self_deposit() {
        let recipient = Address::repeat_byte(0x22);
        let data = deposit_calldata(recipient, 200_000);
        let call = OptimismPortal::depositTransactionCall::abi_decode(&data, true).unwrap();

        assert_eq!(call.to, recipient);
        assert_eq!(call.gasLimit, 200_000);
        assert!(call.data.is_empty());
    }
}
