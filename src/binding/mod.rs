pub mod calls;
pub mod descriptor;

pub use calls::{BookRecord, BorrowRecord};
pub use descriptor::{EndpointDescriptor, EventSpec, Mutability, Operation, OperationSpec};

use crate::error::ConfigError;
use alloy_primitives::Address;

/// Deployed address of the library contract on the default local node.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";

/// Interface description shipped with the contract deployment.
pub const BUNDLED_ABI: &str = include_str!("../../abi/LibraryManagement.json");

/// Operations the gateway calls, with the mutability each must be declared with.
const REQUIRED: [(Operation, Mutability); 4] = [
    (Operation::BorrowBook, Mutability::StateChanging),
    (Operation::BookCount, Mutability::ReadOnly),
    (Operation::Books, Mutability::ReadOnly),
    (Operation::SearchBorrowHistory, Mutability::ReadOnly),
];

/// Encoded call ready to be addressed to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub operation: Operation,
    pub to: Address,
    pub data: Vec<u8>,
}

/// The contract endpoint: validated descriptor plus typed call stubs.
#[derive(Debug, Clone)]
pub struct EndpointBinding {
    descriptor: EndpointDescriptor,
}

impl EndpointBinding {
    /// Checks that every operation the stubs encode is declared with the same
    /// parameter list and mutability the stubs assume.
    pub fn new(descriptor: EndpointDescriptor) -> Result<Self, ConfigError> {
        let stubs = calls::stub_signatures();

        for (operation, mutability) in REQUIRED {
            let spec = descriptor
                .operation(operation)
                .ok_or(ConfigError::MissingOperation(operation.name()))?;

            if spec.mutability != mutability {
                return Err(ConfigError::WrongMutability(operation.name()));
            }

            let declared = spec.signature();
            if let Some((_, expected)) = stubs.iter().find(|(name, _)| *name == operation.name())
            {
                if declared != *expected {
                    return Err(ConfigError::SignatureMismatch {
                        name: operation.name(),
                        expected: expected.to_string(),
                        found: declared,
                    });
                }
            }
        }

        log::debug!(
            "endpoint binding ready: {} operations, {} events at {}",
            descriptor.operations().len(),
            descriptor.events().len(),
            descriptor.address()
        );

        Ok(Self { descriptor })
    }

    pub fn from_abi_json(address: &str, abi_json: &str) -> Result<Self, ConfigError> {
        Self::new(EndpointDescriptor::from_abi_json(address, abi_json)?)
    }

    /// Binding against the bundled interface description.
    pub fn library(address: &str) -> Result<Self, ConfigError> {
        Self::from_abi_json(address, BUNDLED_ABI)
    }

    pub fn address(&self) -> Address {
        self.descriptor.address()
    }

    pub fn descriptor(&self) -> &EndpointDescriptor {
        &self.descriptor
    }

    pub fn borrow_book(&self, search_criteria: &str, borrow_duration_days: u64) -> ContractCall {
        self.call(
            Operation::BorrowBook,
            calls::encode_borrow_book(search_criteria, borrow_duration_days),
        )
    }

    pub fn book_count(&self) -> ContractCall {
        self.call(Operation::BookCount, calls::encode_book_count())
    }

    pub fn books(&self, book_id: u64) -> ContractCall {
        self.call(Operation::Books, calls::encode_books(book_id))
    }

    pub fn search_borrow_history(&self, search_criteria: &str) -> ContractCall {
        self.call(
            Operation::SearchBorrowHistory,
            calls::encode_search_borrow_history(search_criteria),
        )
    }

    fn call(&self, operation: Operation, data: Vec<u8>) -> ContractCall {
        ContractCall {
            operation,
            to: self.descriptor.address(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_interface_binds() {
        let binding = EndpointBinding::library(DEFAULT_CONTRACT_ADDRESS).unwrap();
        let descriptor = binding.descriptor();

        assert_eq!(descriptor.operations().len(), Operation::ALL.len());
        assert_eq!(descriptor.events().len(), 7);

        let borrow = descriptor.operation(Operation::BorrowBook).unwrap();
        assert_eq!(borrow.params, vec!["string".to_string(), "uint256".to_string()]);
        assert!(borrow.mutates_state());

        for read in [Operation::BookCount, Operation::Books, Operation::Owner] {
            assert!(!descriptor.operation(read).unwrap().mutates_state());
        }
    }

    #[test]
    fn borrow_call_targets_contract() {
        let binding = EndpointBinding::library(DEFAULT_CONTRACT_ADDRESS).unwrap();
        let call = binding.borrow_book("Dune", 7);

        assert_eq!(call.operation, Operation::BorrowBook);
        assert_eq!(call.to, binding.address());
        assert_eq!(call.data, calls::encode_borrow_book("Dune", 7));
    }

    #[test]
    fn missing_borrow_operation_is_fatal() {
        let abi = r#"[{"type":"function","name":"bookCount","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]}]"#;
        let err = EndpointBinding::from_abi_json(DEFAULT_CONTRACT_ADDRESS, abi).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOperation("borrowBook")));
    }

    #[test]
    fn mismatched_parameters_are_fatal() {
        let abi = r#"[
            {"type":"function","name":"borrowBook","stateMutability":"nonpayable",
             "inputs":[{"name":"_searchCriteria","type":"string"},{"name":"_borrowDuration","type":"uint8"}],
             "outputs":[]}
        ]"#;
        let err = EndpointBinding::from_abi_json(DEFAULT_CONTRACT_ADDRESS, abi).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SignatureMismatch {
                name: "borrowBook",
                ..
            }
        ));
    }

    #[test]
    fn read_operation_declared_mutating_is_fatal() {
        let abi = r#"[
            {"type":"function","name":"borrowBook","stateMutability":"nonpayable",
             "inputs":[{"name":"a","type":"string"},{"name":"b","type":"uint256"}],"outputs":[]},
            {"type":"function","name":"bookCount","stateMutability":"nonpayable","inputs":[],"outputs":[]}
        ]"#;
        let err = EndpointBinding::from_abi_json(DEFAULT_CONTRACT_ADDRESS, abi).unwrap_err();
        assert!(matches!(err, ConfigError::WrongMutability("bookCount")));
    }
}
