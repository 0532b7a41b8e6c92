use crate::error::ConfigError;
use alloy_primitives::Address;
use serde::Deserialize;
use std::str::FromStr;

/// Whether invoking a remote operation changes ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    ReadOnly,
    StateChanging,
}

impl Mutability {
    fn from_abi(state_mutability: &str) -> Option<Self> {
        match state_mutability {
            "view" | "pure" => Some(Mutability::ReadOnly),
            "nonpayable" | "payable" => Some(Mutability::StateChanging),
            _ => None,
        }
    }
}

/// Every operation exposed by the library contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddBookByLibrarian,
    AuthenticateUser,
    BorrowBook,
    DeauthenticateUser,
    ReturnBook,
    SetPenaltyAmount,
    AuthenticatedUsers,
    BookBorrowHistory,
    BookCount,
    Books,
    DefaultPenaltyAmount,
    GetBorrowHistory,
    Owner,
    SearchBorrowHistory,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::AddBookByLibrarian,
        Operation::AuthenticateUser,
        Operation::BorrowBook,
        Operation::DeauthenticateUser,
        Operation::ReturnBook,
        Operation::SetPenaltyAmount,
        Operation::AuthenticatedUsers,
        Operation::BookBorrowHistory,
        Operation::BookCount,
        Operation::Books,
        Operation::DefaultPenaltyAmount,
        Operation::GetBorrowHistory,
        Operation::Owner,
        Operation::SearchBorrowHistory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::AddBookByLibrarian => "addBookByLibrarian",
            Operation::AuthenticateUser => "authenticateUser",
            Operation::BorrowBook => "borrowBook",
            Operation::DeauthenticateUser => "deauthenticateUser",
            Operation::ReturnBook => "returnBook",
            Operation::SetPenaltyAmount => "setPenaltyAmount",
            Operation::AuthenticatedUsers => "authenticatedUsers",
            Operation::BookBorrowHistory => "bookBorrowHistory",
            Operation::BookCount => "bookCount",
            Operation::Books => "books",
            Operation::DefaultPenaltyAmount => "defaultPenaltyAmount",
            Operation::GetBorrowHistory => "getBorrowHistory",
            Operation::Owner => "owner",
            Operation::SearchBorrowHistory => "searchBorrowHistory",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSpec {
    pub operation: Operation,
    pub params: Vec<String>,
    pub outputs: Vec<String>,
    pub mutability: Mutability,
}

impl OperationSpec {
    pub fn name(&self) -> &'static str {
        self.operation.name()
    }

    /// Canonical signature, e.g. `borrowBook(string,uint256)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name(), self.params.join(","))
    }

    pub fn mutates_state(&self) -> bool {
        self.mutability == Mutability::StateChanging
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    pub name: String,
    pub fields: Vec<String>,
}

/// Contract address plus the typed operation table parsed from its JSON interface description.
/// Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    address: Address,
    operations: Vec<OperationSpec>,
    events: Vec<EventSpec>,
}

#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    components: Vec<AbiParam>,
}

impl AbiParam {
    /// `tuple` types are expanded to their component list, keeping any array suffix.
    fn canonical_type(&self) -> Result<String, ConfigError> {
        if self.kind.is_empty() {
            return Err(ConfigError::MalformedInterface(
                "parameter with empty type".to_string(),
            ));
        }
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                if self.components.is_empty() {
                    return Err(ConfigError::MalformedInterface(format!(
                        "tuple parameter `{}` has no components",
                        self.kind
                    )));
                }
                let inner = self
                    .components
                    .iter()
                    .map(AbiParam::canonical_type)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({}){}", inner.join(","), suffix))
            }
            None => Ok(self.kind.clone()),
        }
    }
}

fn canonical_types(params: &[AbiParam]) -> Result<Vec<String>, ConfigError> {
    params.iter().map(AbiParam::canonical_type).collect()
}

impl EndpointDescriptor {
    pub fn from_abi_json(address: &str, abi_json: &str) -> Result<Self, ConfigError> {
        let address = Address::from_str(address.trim())
            .map_err(|_| ConfigError::InvalidAddress(address.to_string()))?;

        let entries: Vec<AbiEntry> = serde_json::from_str(abi_json)
            .map_err(|e| ConfigError::MalformedInterface(e.to_string()))?;

        let mut operations: Vec<OperationSpec> = Vec::new();
        let mut events = Vec::new();

        for entry in entries {
            match entry.kind.as_str() {
                "function" => {
                    let name = entry.name.ok_or_else(|| {
                        ConfigError::MalformedInterface("function entry without a name".to_string())
                    })?;
                    let state_mutability = entry.state_mutability.ok_or_else(|| {
                        ConfigError::MalformedInterface(format!(
                            "function `{}` has no stateMutability",
                            name
                        ))
                    })?;
                    let mutability = Mutability::from_abi(&state_mutability).ok_or_else(|| {
                        ConfigError::MalformedInterface(format!(
                            "function `{}` has unknown stateMutability `{}`",
                            name, state_mutability
                        ))
                    })?;

                    let Some(operation) = Operation::from_name(&name) else {
                        log::debug!("ignoring unbound function `{}`", name);
                        continue;
                    };
                    if operations.iter().any(|spec| spec.operation == operation) {
                        return Err(ConfigError::MalformedInterface(format!(
                            "function `{}` is declared more than once",
                            name
                        )));
                    }

                    operations.push(OperationSpec {
                        operation,
                        params: canonical_types(&entry.inputs)?,
                        outputs: canonical_types(&entry.outputs)?,
                        mutability,
                    });
                }
                "event" => {
                    let name = entry.name.ok_or_else(|| {
                        ConfigError::MalformedInterface("event entry without a name".to_string())
                    })?;
                    events.push(EventSpec {
                        name,
                        fields: canonical_types(&entry.inputs)?,
                    });
                }
                "constructor" | "fallback" | "receive" | "error" => {}
                other => {
                    return Err(ConfigError::MalformedInterface(format!(
                        "unknown entry type `{}`",
                        other
                    )));
                }
            }
        }

        Ok(Self {
            address,
            operations,
            events,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn operation(&self, operation: Operation) -> Option<&OperationSpec> {
        self.operations
            .iter()
            .find(|spec| spec.operation == operation)
    }

    /// Operations in declaration order.
    pub fn operations(&self) -> &[OperationSpec] {
        &self.operations
    }

    pub fn events(&self) -> &[EventSpec] {
        &self.events
    }
}
