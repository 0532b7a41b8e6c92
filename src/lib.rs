//! Submission gateway for the library ledger contract.
//!
//! Raw form values are validated into a [`gateway::BorrowRequest`], sent as a
//! `borrowBook` transaction through a [`network::ConnectionContext`], and every
//! possible result is folded into one [`gateway::OutcomeRecord`] that
//! [`reporter::present`] turns into a display message.

pub mod binding;
pub mod config;
pub mod error;
pub mod gateway;
pub mod network;
pub mod reporter;

pub use binding::EndpointBinding;
pub use config::GatewayConfig;
pub use error::{CallError, ConfigError};
pub use gateway::{FlowState, OutcomeRecord, RawBorrowInput, RawDuration, Submission, TransactionGateway};
pub use network::ConnectionContext;
pub use reporter::{DisplayMessage, present};
