//! JSON-RPC 2.0 transport over HTTP.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use votechain_types::{Address, TxHash};

use crate::error::GatewayError;
use crate::receipt::TransactionReceipt;

/// HTTP client for an Ethereum-style JSON-RPC endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL and provides typed methods
/// for each RPC method the gateway and wallet need. Clones share the
/// connection pool and the request-id counter.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

/// A call or transaction addressed to a contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Vec<u8>,
}

impl CallRequest {
    fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "to": self.to.to_string(),
            "data": format!("0x{}", hex::encode(&self.data)),
        });
        if let (Some(from), Some(map)) = (self.from, obj.as_object_mut()) {
            map.insert("from".to_string(), serde_json::json!(from.to_string()));
        }
        obj
    }
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl From<RpcErrorObject> for GatewayError {
    fn from(e: RpcErrorObject) -> Self {
        let data = e.data.map(|d| match d {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        GatewayError::Rpc {
            code: e.code,
            message: e.message,
            data,
        }
    }
}

impl RpcClient {
    /// Create a client targeting the given endpoint (e.g. `http://127.0.0.1:8545`).
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and deserialize its `result`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!(method, id, url = %self.url, "rpc request");
        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Transport(format!("{method} timed out: {e}"))
                } else if e.is_connect() {
                    GatewayError::Transport(format!("cannot reach {}: {e}", self.url))
                } else {
                    GatewayError::Transport(format!("{method} failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!(
                "endpoint returned HTTP {}",
                response.status()
            )));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{method}: {e}")))?;

        if let Some(err) = envelope.error {
            return Err(err.into());
        }

        serde_json::from_value(envelope.result.unwrap_or(serde_json::Value::Null))
            .map_err(|e| GatewayError::InvalidResponse(format!("{method} result: {e}")))
    }

    /// Execute a read-only call against the latest block.
    pub async fn call(&self, req: &CallRequest) -> Result<Vec<u8>, GatewayError> {
        self.call_at(req, "latest").await
    }

    /// Execute a read-only call against a specific block tag or number.
    pub async fn call_at(&self, req: &CallRequest, block: &str) -> Result<Vec<u8>, GatewayError> {
        let raw: String = self
            .request("eth_call", serde_json::json!([req.to_json(), block]))
            .await?;
        decode_hex_bytes(&raw)
    }

    pub async fn get_code(&self, address: &Address) -> Result<Vec<u8>, GatewayError> {
        let raw: String = self
            .request(
                "eth_getCode",
                serde_json::json!([address.to_string(), "latest"]),
            )
            .await?;
        decode_hex_bytes(&raw)
    }

    pub async fn chain_id(&self) -> Result<u64, GatewayError> {
        let raw: String = self.request("eth_chainId", serde_json::json!([])).await?;
        parse_quantity(&raw)
    }

    pub async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        let raw: Vec<String> = self.request("eth_accounts", serde_json::json!([])).await?;
        parse_addresses(&raw)
    }

    /// Ask the wallet to expose its accounts, prompting the user if needed.
    pub async fn request_accounts(&self) -> Result<Vec<Address>, GatewayError> {
        let raw: Vec<String> = self
            .request("eth_requestAccounts", serde_json::json!([]))
            .await?;
        parse_addresses(&raw)
    }

    /// Submit a transaction for the wallet to sign and broadcast.
    pub async fn send_transaction(&self, req: &CallRequest) -> Result<TxHash, GatewayError> {
        let raw: String = self
            .request("eth_sendTransaction", serde_json::json!([req.to_json()]))
            .await?;
        Ok(TxHash::parse(&raw)?)
    }

    /// Fetch a receipt; `None` while the transaction is still pending.
    pub async fn transaction_receipt(
        &self,
        hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, GatewayError> {
        self.request(
            "eth_getTransactionReceipt",
            serde_json::json!([hash.to_string()]),
        )
        .await
    }
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_quantity(raw: &str) -> Result<u64, GatewayError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| GatewayError::InvalidResponse(format!("not a hex quantity: {raw}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|_| GatewayError::InvalidResponse(format!("not a hex quantity: {raw}")))
}

/// Decode `0x`-prefixed hex data.
pub fn decode_hex_bytes(raw: &str) -> Result<Vec<u8>, GatewayError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|_| GatewayError::InvalidResponse(format!("not hex data: {raw}")))
}

fn parse_addresses(raw: &[String]) -> Result<Vec<Address>, GatewayError> {
    raw.iter()
        .map(|s| Address::parse(s).map_err(GatewayError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1a").unwrap(), 26);
        assert!(parse_quantity("26").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn hex_data() {
        assert_eq!(decode_hex_bytes("0x").unwrap(), Vec::<u8>::new());
        assert_eq!(decode_hex_bytes("0x0a0b").unwrap(), vec![10, 11]);
        assert!(decode_hex_bytes("0x0").is_err());
    }

    #[test]
    fn call_request_json_omits_missing_sender() {
        let req = CallRequest {
            from: None,
            to: Address::new([1; 20]),
            data: vec![0xab],
        };
        let json = req.to_json();
        assert!(json.get("from").is_none());
        assert_eq!(json["data"], "0xab");

        let signed = CallRequest {
            from: Some(Address::new([2; 20])),
            ..req
        };
        assert_eq!(
            signed.to_json()["from"],
            "0x0202020202020202020202020202020202020202"
        );
    }

    #[test]
    fn rpc_error_data_is_preserved_as_text() {
        let obj: RpcErrorObject = serde_json::from_str(
            r#"{"code":3,"message":"execution reverted: Already voted","data":"0x08c379a0"}"#,
        )
        .unwrap();
        match GatewayError::from(obj) {
            GatewayError::Rpc { code, data, .. } => {
                assert_eq!(code, 3);
                assert_eq!(data.as_deref(), Some("0x08c379a0"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn client_keeps_url() {
        let client = RpcClient::new("http://127.0.0.1:8545").unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:8545");
    }
}
