use crate::binding::{BookRecord, BorrowRecord, ContractCall, EndpointBinding, calls};
use crate::error::CallError;
use crate::gateway::outcome::{FlowState, OutcomeRecord, Submission};
use crate::gateway::validator::{BorrowRequest, RawBorrowInput, validate_raw};
use crate::network::ConnectionContext;
use alloy_primitives::{B256, U256};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;

struct Flow {
    state: FlowState,
    submitted_at: DateTime<Utc>,
}

impl Flow {
    fn start() -> Self {
        Self {
            state: FlowState::Idle,
            submitted_at: Utc::now(),
        }
    }

    fn advance(&mut self, next: FlowState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        log::debug!("borrow flow {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn finish(mut self, outcome: OutcomeRecord) -> Submission {
        self.advance(outcome.terminal_state());
        Submission {
            state: self.state,
            outcome,
            submitted_at: self.submitted_at,
        }
    }
}

/// Maps a failed remote call onto the outcome reported to the caller.
pub fn classify(err: CallError) -> OutcomeRecord {
    match err {
        CallError::Rejected { message, data, .. } => OutcomeRecord::RemoteRejection {
            message: data
                .as_deref()
                .and_then(calls::decode_revert_reason)
                .unwrap_or(message),
        },
        CallError::Transport(message) => OutcomeRecord::TransportFailure { message },
        timeout @ CallError::Timeout(_) => OutcomeRecord::TransportFailure {
            message: timeout.to_string(),
        },
    }
}

/// Drives borrow submissions against the library contract.
///
/// Submissions are serialized: while one is waiting on the node, the next waits for
/// it to settle before sending its own transaction. Read queries bypass the slot.
pub struct TransactionGateway {
    binding: Arc<EndpointBinding>,
    context: Arc<ConnectionContext>,
    submit_timeout: Option<Duration>,
    slot: Mutex<()>,
}

impl TransactionGateway {
    pub fn new(binding: Arc<EndpointBinding>, context: Arc<ConnectionContext>) -> Self {
        Self {
            binding,
            context,
            submit_timeout: None,
            slot: Mutex::new(()),
        }
    }

    /// Bounds each remote call; expiry is reported as a transport failure.
    pub fn with_submit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.submit_timeout = timeout;
        self
    }

    pub fn binding(&self) -> &EndpointBinding {
        &self.binding
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    /// Runs one borrow attempt to a terminal state. Never fails: every error becomes
    /// part of the returned outcome.
    pub async fn submit(&self, input: RawBorrowInput) -> Submission {
        let mut flow = Flow::start();
        flow.advance(FlowState::Validating);

        let request = match validate_raw(&input) {
            Ok(request) => request,
            Err(reason) => {
                log::warn!("borrow input refused: {}", reason);
                return flow.finish(OutcomeRecord::ValidationFailure { reason });
            }
        };

        flow.advance(FlowState::Submitting);
        let _slot = self.slot.lock().await;

        let outcome = match self.send_borrow(&request).await {
            Ok(tx_hash) => {
                flow.advance(FlowState::AwaitingConfirmation);
                log::info!(
                    "borrowBook(\"{}\", {}) confirmed: {}",
                    request.search_criteria(),
                    request.borrow_duration_days(),
                    tx_hash
                );
                OutcomeRecord::Success {
                    confirmation_ref: tx_hash,
                }
            }
            Err(err) => {
                log::warn!("borrowBook(\"{}\") failed: {}", request.search_criteria(), err);
                classify(err)
            }
        };

        flow.finish(outcome)
    }

    async fn send_borrow(&self, request: &BorrowRequest) -> Result<B256, CallError> {
        let call = self
            .binding
            .borrow_book(request.search_criteria(), request.borrow_duration_days());
        let tx = self.context.current_identity().authorize(call.to, call.data);
        log::debug!(
            "sending borrowBook from {} to {}",
            self.context.current_identity(),
            tx.to
        );
        self.bounded(self.context.transport().send_transaction(&tx))
            .await
    }

    pub async fn book_count(&self) -> Result<U256, CallError> {
        let data = self.read(self.binding.book_count()).await?;
        calls::decode_book_count(&data)
    }

    pub async fn book(&self, book_id: u64) -> Result<BookRecord, CallError> {
        let data = self.read(self.binding.books(book_id)).await?;
        calls::decode_books(&data)
    }

    pub async fn search_borrow_history(
        &self,
        search_criteria: &str,
    ) -> Result<Vec<BorrowRecord>, CallError> {
        let data = self
            .read(self.binding.search_borrow_history(search_criteria))
            .await?;
        calls::decode_search_borrow_history(&data)
    }

    async fn read(&self, call: ContractCall) -> Result<Vec<u8>, CallError> {
        log::debug!("calling {}", call.operation.name());
        let tx = self.context.current_identity().authorize(call.to, call.data);
        self.bounded(self.context.transport().call(&tx)).await
    }

    async fn bounded<T>(
        &self,
        pending: impl Future<Output = Result<T, CallError>>,
    ) -> Result<T, CallError> {
        match self.submit_timeout {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(result) => result,
                Err(_) => Err(CallError::Timeout(limit)),
            },
            None => pending.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_payload_reason_wins_over_node_message() {
        let data = {
            use alloy_sol_types::{Revert, SolError};
            Revert {
                reason: "book unavailable".to_string(),
            }
            .abi_encode()
        };
        let outcome = classify(CallError::Rejected {
            code: 3,
            message: "execution reverted: book unavailable".to_string(),
            data: Some(data),
        });
        assert_eq!(
            outcome,
            OutcomeRecord::RemoteRejection {
                message: "book unavailable".to_string()
            }
        );
    }

    #[test]
    fn node_message_is_kept_without_revert_payload() {
        let outcome = classify(CallError::Rejected {
            code: -32000,
            message: "sender account not recognized".to_string(),
            data: None,
        });
        assert_eq!(
            outcome,
            OutcomeRecord::RemoteRejection {
                message: "sender account not recognized".to_string()
            }
        );
    }

    #[test]
    fn timeouts_become_transport_failures() {
        let outcome = classify(CallError::Timeout(Duration::from_millis(250)));
        assert_eq!(
            outcome,
            OutcomeRecord::TransportFailure {
                message: "request timed out after 250ms".to_string()
            }
        );
    }
}
