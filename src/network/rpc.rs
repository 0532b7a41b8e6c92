use crate::error::CallError;
use crate::network::transport::{LedgerTransport, TransactionRequest};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

const JSONRPC_VERSION: &str = "2.0";

/// Error codes for requests the node could not even interpret. Anything else in an
/// error object is the node refusing the call itself.
const PROTOCOL_ERROR_CODES: [i64; 3] = [-32700, -32600, -32601];

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Ethereum JSON-RPC over HTTP.
pub struct JsonRpcTransport {
    url: String,
    client: Client,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, CallError> {
        let body = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CallError::Transport(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        let payload: JsonRpcResponse = response.json().await.map_err(|e| {
            if status.is_success() {
                CallError::Transport(format!("malformed {} response: {}", method, e))
            } else {
                CallError::Transport(format!("node returned HTTP status {}", status))
            }
        })?;

        if let Some(error) = payload.error {
            if PROTOCOL_ERROR_CODES.contains(&error.code) {
                return Err(CallError::Transport(format!(
                    "{} rejected by node protocol ({}): {}",
                    method, error.code, error.message
                )));
            }
            return Err(CallError::Rejected {
                code: error.code,
                message: error.message,
                data: error.data.as_ref().and_then(error_data_bytes),
            });
        }

        let result = payload.result.ok_or_else(|| {
            CallError::Transport(format!("{} response is missing its result", method))
        })?;
        serde_json::from_value(result)
            .map_err(|e| CallError::Transport(format!("unexpected {} result: {}", method, e)))
    }
}

/// Revert payloads arrive either as a bare hex string or nested under a `data` key.
fn error_data_bytes(data: &Value) -> Option<Vec<u8>> {
    match data {
        Value::String(s) => decode_hex(s),
        Value::Object(map) => map.get("data").and_then(error_data_bytes),
        _ => None,
    }
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).ok()
}

fn parse_quantity(s: &str) -> Result<u64, CallError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
        .map_err(|_| CallError::Transport(format!("invalid quantity `{}`", s)))
}

fn tx_object(tx: &TransactionRequest) -> Value {
    let mut obj = json!({
        "to": tx.to.to_string(),
        "data": format!("0x{}", hex::encode(&tx.data)),
    });
    if let Some(from) = tx.from {
        obj["from"] = Value::String(from.to_string());
    }
    obj
}

#[async_trait]
impl LedgerTransport for JsonRpcTransport {
    async fn chain_id(&self) -> Result<u64, CallError> {
        let quantity: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&quantity)
    }

    async fn accounts(&self) -> Result<Vec<Address>, CallError> {
        let accounts: Vec<String> = self.request("eth_accounts", json!([])).await?;
        accounts
            .iter()
            .map(|a| {
                Address::from_str(a)
                    .map_err(|_| CallError::Transport(format!("invalid account `{}`", a)))
            })
            .collect()
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, CallError> {
        let hash: String = self
            .request("eth_sendTransaction", json!([tx_object(tx)]))
            .await?;
        B256::from_str(&hash)
            .map_err(|_| CallError::Transport(format!("invalid transaction hash `{}`", hash)))
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Vec<u8>, CallError> {
        let data: String = self
            .request("eth_call", json!([tx_object(tx), "latest"]))
            .await?;
        decode_hex(&data)
            .ok_or_else(|| CallError::Transport(format!("invalid call result `{}`", data)))
    }
}
