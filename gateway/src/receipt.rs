//! Transaction receipts as returned by `eth_getTransactionReceipt`.

use serde::Deserialize;

use votechain_abi::Log;
use votechain_types::{Address, TxHash};

use crate::rpc::{decode_hex_bytes, parse_quantity};
use crate::GatewayError;

/// A mined transaction's outcome.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawReceipt")]
pub struct TransactionReceipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// `false` when the transaction reverted.
    pub success: bool,
    pub logs: Vec<Log>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    /// Post-Byzantium status; absent on very old chains, treated as success.
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    logs: Vec<RawLog>,
}

#[derive(Deserialize)]
struct RawLog {
    address: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    data: String,
}

impl TryFrom<RawReceipt> for TransactionReceipt {
    type Error = GatewayError;

    fn try_from(raw: RawReceipt) -> Result<Self, Self::Error> {
        let block_number = raw
            .block_number
            .as_deref()
            .map(parse_quantity)
            .transpose()?
            .unwrap_or(0);
        let success = match raw.status.as_deref() {
            Some(s) => parse_quantity(s)? == 1,
            None => true,
        };
        let logs = raw
            .logs
            .into_iter()
            .map(RawLog::into_log)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tx_hash: TxHash::parse(&raw.transaction_hash)?,
            block_number,
            success,
            logs,
        })
    }
}

impl RawLog {
    fn into_log(self) -> Result<Log, GatewayError> {
        let topics = self
            .topics
            .iter()
            .map(|t| {
                let bytes = decode_hex_bytes(t)?;
                <[u8; 32]>::try_from(bytes.as_slice())
                    .map_err(|_| GatewayError::InvalidResponse(format!("bad topic {t}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Log {
            address: Address::parse(&self.address)?,
            topics,
            data: decode_hex_bytes(&self.data)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIPT: &str = r#"{
        "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
        "blockNumber": "0x10",
        "status": "0x1",
        "gasUsed": "0x5208",
        "logs": [{
            "address": "0x2222222222222222222222222222222222222222",
            "topics": ["0x3333333333333333333333333333333333333333333333333333333333333333"],
            "data": "0x"
        }]
    }"#;

    #[test]
    fn parses_successful_receipt() {
        let receipt: TransactionReceipt = serde_json::from_str(RECEIPT).unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.block_number, 16);
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].topics[0], [0x33; 32]);
        assert!(receipt.logs[0].data.is_empty());
    }

    #[test]
    fn status_zero_is_failure() {
        let json = RECEIPT.replace("\"status\": \"0x1\"", "\"status\": \"0x0\"");
        let receipt: TransactionReceipt = serde_json::from_str(&json).unwrap();
        assert!(!receipt.success);
    }

    #[test]
    fn null_result_means_pending() {
        let pending: Option<TransactionReceipt> = serde_json::from_str("null").unwrap();
        assert!(pending.is_none());
    }

    #[test]
    fn short_topic_is_rejected() {
        let json = RECEIPT.replace(
            "0x3333333333333333333333333333333333333333333333333333333333333333",
            "0x33",
        );
        assert!(serde_json::from_str::<TransactionReceipt>(&json).is_err());
    }
}
