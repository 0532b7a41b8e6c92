use crate::error::CallError;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;

/// Transaction or call addressed to the ledger. Gas and nonce are left to the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Vec<u8>,
}

/// Wire access to a ledger node.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    async fn chain_id(&self) -> Result<u64, CallError>;

    /// Accounts the node can sign for.
    async fn accounts(&self) -> Result<Vec<Address>, CallError>;

    /// Submits a state-changing transaction, resolving to its hash once the node accepts it.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, CallError>;

    /// Executes a read-only call against the latest block.
    async fn call(&self, tx: &TransactionRequest) -> Result<Vec<u8>, CallError>;
}
