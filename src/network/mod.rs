pub mod context;
pub mod rpc;
pub mod transport;

pub use context::{ConnectionContext, Identity};
pub use rpc::JsonRpcTransport;
pub use transport::{LedgerTransport, TransactionRequest};
