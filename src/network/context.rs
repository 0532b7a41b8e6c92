use crate::error::CallError;
use crate::network::rpc::JsonRpcTransport;
use crate::network::transport::{LedgerTransport, TransactionRequest};
use alloy_primitives::Address;
use std::fmt;
use std::sync::Arc;

/// Account whose authority is attached to state-changing calls. The node holds the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    address: Address,
}

impl Identity {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Stamps the identity onto an outgoing request.
    pub fn authorize(&self, to: Address, data: Vec<u8>) -> TransactionRequest {
        TransactionRequest {
            from: Some(self.address),
            to,
            data,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// Open transport to one ledger node plus the identity used for this session.
/// Read-only once connected.
pub struct ConnectionContext {
    node_url: String,
    chain_id: u64,
    identity: Identity,
    transport: Arc<dyn LedgerTransport>,
}

impl ConnectionContext {
    /// Connects over JSON-RPC. Without an explicit identity the node's first managed
    /// account is used.
    pub async fn connect(node_url: &str, identity: Option<Address>) -> Result<Self, CallError> {
        let transport = Arc::new(JsonRpcTransport::new(node_url));
        Self::connect_with(node_url, transport, identity).await
    }

    pub async fn connect_with(
        node_url: &str,
        transport: Arc<dyn LedgerTransport>,
        identity: Option<Address>,
    ) -> Result<Self, CallError> {
        log::info!("connecting to ledger node at {}", node_url);

        let chain_id = transport.chain_id().await?;

        let address = match identity {
            Some(address) => address,
            None => transport
                .accounts()
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    CallError::Transport("node exposes no accounts to sign with".to_string())
                })?,
        };

        log::info!("connected: chain id {}, identity {}", chain_id, address);

        Ok(Self {
            node_url: node_url.to_string(),
            chain_id,
            identity: Identity::new(address),
            transport,
        })
    }

    pub fn current_identity(&self) -> Identity {
        self.identity
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn transport(&self) -> &dyn LedgerTransport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("node_url", &self.node_url)
            .field("chain_id", &self.chain_id)
            .field("identity", &self.identity)
            .finish()
    }
}
