//! Typed call stubs for the library contract.
//!
//! Calldata encoding and return decoding go through `sol!`-generated types, so the
//! selectors and parameter layout always match the declared Solidity signatures.

use crate::error::CallError;
use alloy_primitives::U256;
use alloy_sol_types::{Revert, SolCall, SolError, sol};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct BorrowRecord {
        bool borrowed;
        uint256 borrowTimestamp;
        uint256 returnTimestamp;
    }

    function borrowBook(string _searchCriteria, uint256 _borrowDuration) external;

    function bookCount() external view returns (uint256);

    function books(uint256) external view returns (uint256 id, string title, string author, bool available);

    function searchBorrowHistory(string _searchCriteria) external view returns (BorrowRecord[]);
}

/// One entry of the contract's `books` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: U256,
    pub title: String,
    pub author: String,
    pub available: bool,
}

pub fn encode_borrow_book(search_criteria: &str, borrow_duration_days: u64) -> Vec<u8> {
    borrowBookCall {
        _searchCriteria: search_criteria.to_string(),
        _borrowDuration: U256::from(borrow_duration_days),
    }
    .abi_encode()
}

pub fn encode_book_count() -> Vec<u8> {
    bookCountCall {}.abi_encode()
}

pub fn encode_books(book_id: u64) -> Vec<u8> {
    booksCall {
        _0: U256::from(book_id),
    }
    .abi_encode()
}

pub fn encode_search_borrow_history(search_criteria: &str) -> Vec<u8> {
    searchBorrowHistoryCall {
        _searchCriteria: search_criteria.to_string(),
    }
    .abi_encode()
}

fn malformed(operation: &str, err: alloy_sol_types::Error) -> CallError {
    CallError::Transport(format!("malformed `{}` return data: {}", operation, err))
}

pub fn decode_book_count(data: &[u8]) -> Result<U256, CallError> {
    bookCountCall::abi_decode_returns(data, true)
        .map(|ret| ret._0)
        .map_err(|e| malformed("bookCount", e))
}

pub fn decode_books(data: &[u8]) -> Result<BookRecord, CallError> {
    let ret = booksCall::abi_decode_returns(data, true).map_err(|e| malformed("books", e))?;
    Ok(BookRecord {
        id: ret.id,
        title: ret.title,
        author: ret.author,
        available: ret.available,
    })
}

pub fn decode_search_borrow_history(data: &[u8]) -> Result<Vec<BorrowRecord>, CallError> {
    searchBorrowHistoryCall::abi_decode_returns(data, true)
        .map(|ret| ret._0)
        .map_err(|e| malformed("searchBorrowHistory", e))
}

/// Reason string carried by a standard `Error(string)` revert payload.
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    Revert::abi_decode(data, true).ok().map(|revert| revert.reason)
}

/// Signatures the stubs above encode against, checked against the interface description.
pub(crate) fn stub_signatures() -> [(&'static str, &'static str); 4] {
    [
        ("borrowBook", borrowBookCall::SIGNATURE),
        ("bookCount", bookCountCall::SIGNATURE),
        ("books", booksCall::SIGNATURE),
        ("searchBorrowHistory", searchBorrowHistoryCall::SIGNATURE),
    ]
}
