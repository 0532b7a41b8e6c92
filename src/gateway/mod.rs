pub mod flow;
pub mod outcome;
pub mod validator;

pub use flow::{TransactionGateway, classify};
pub use outcome::{FlowState, OutcomeRecord, Submission};
pub use validator::{
    BorrowRequest, DEFAULT_BORROW_DURATION_DAYS, RawBorrowInput, RawDuration, ValidationFailure,
    validate, validate_raw,
};
