//! HTTP client for a Pinata-compatible pinning API.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use votechain_types::ContentHash;

use crate::error::IpfsError;

/// Default timeout for pinning requests; uploads can be slow.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Content-addressed storage for files and JSON documents.
pub trait PinningService: Send + Sync {
    /// Upload a file and return its content hash.
    fn pin_file(
        &self,
        name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<ContentHash, IpfsError>> + Send;

    /// Upload a JSON document and return its content hash.
    fn pin_json(
        &self,
        name: &str,
        value: &serde_json::Value,
    ) -> impl Future<Output = Result<ContentHash, IpfsError>> + Send;

    /// Read back a pinned JSON document.
    fn fetch_json(
        &self,
        hash: &ContentHash,
    ) -> impl Future<Output = Result<serde_json::Value, IpfsError>> + Send;
}

/// Client for the Pinata pinning API.
///
/// `POST {api}/pinning/pinFileToIPFS` (multipart) and
/// `POST {api}/pinning/pinJSONToIPFS` both answer `{"IpfsHash": "..."}`.
/// Reads go through a public gateway at `{gateway}/ipfs/{hash}`.
pub struct PinataClient {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

impl PinataClient {
    pub fn new(
        api_url: impl Into<String>,
        gateway_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self::with_timeout(api_url, gateway_url, api_key, api_secret, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_url: impl Into<String>,
        gateway_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Public URL for a pinned hash.
    pub fn gateway_url(&self, hash: &ContentHash) -> String {
        format!("{}/ipfs/{}", self.gateway_url, hash.as_str())
    }

    /// Fetch and deserialize a pinned JSON document through the gateway.
    pub async fn fetch<T: DeserializeOwned>(&self, hash: &ContentHash) -> Result<T, IpfsError> {
        let url = self.gateway_url(hash);
        tracing::debug!(%url, "fetching pinned document");
        let response = self.http.get(&url).send().await.map_err(map_send_error)?;
        if !response.status().is_success() {
            return Err(IpfsError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| IpfsError::InvalidResponse(format!("failed to parse document: {e}")))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/pinning/{path}", self.api_url)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.api_secret)
    }
}

impl PinningService for PinataClient {
    async fn pin_file(&self, name: &str, bytes: Vec<u8>) -> Result<ContentHash, IpfsError> {
        if bytes.is_empty() {
            return Err(IpfsError::EmptyUpload);
        }
        let size = bytes.len();
        let part = reqwest::multipart::Part::bytes(bytes).file_name(name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let req = self
            .authorized(self.http.post(self.endpoint("pinFileToIPFS")))
            .multipart(form);
        let hash = send_pin(req).await?;
        tracing::info!(name, size, hash = hash.as_str(), "file pinned");
        Ok(hash)
    }

    async fn pin_json(&self, name: &str, value: &serde_json::Value) -> Result<ContentHash, IpfsError> {
        let body = serde_json::json!({
            "pinataContent": value,
            "pinataMetadata": { "name": name },
        });
        let req = self
            .authorized(self.http.post(self.endpoint("pinJSONToIPFS")))
            .json(&body);
        let hash = send_pin(req).await?;
        tracing::info!(name, hash = hash.as_str(), "JSON pinned");
        Ok(hash)
    }

    async fn fetch_json(&self, hash: &ContentHash) -> Result<serde_json::Value, IpfsError> {
        self.fetch(hash).await
    }
}

async fn send_pin(req: reqwest::RequestBuilder) -> Result<ContentHash, IpfsError> {
    let response = req.send().await.map_err(map_send_error)?;
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(IpfsError::Unauthorized);
    }
    if !status.is_success() {
        return Err(IpfsError::RequestFailed(format!("HTTP status {status}")));
    }
    let body: PinResponse = response
        .json()
        .await
        .map_err(|e| IpfsError::InvalidResponse(format!("failed to parse pin response: {e}")))?;
    parse_pin_hash(&body.ipfs_hash)
}

fn parse_pin_hash(raw: &str) -> Result<ContentHash, IpfsError> {
    ContentHash::parse(raw).map_err(|e| IpfsError::InvalidResponse(e.to_string()))
}

fn map_send_error(e: reqwest::Error) -> IpfsError {
    if e.is_timeout() {
        IpfsError::Unreachable(format!("request timed out: {e}"))
    } else if e.is_connect() {
        IpfsError::Unreachable(format!("connection failed: {e}"))
    } else {
        IpfsError::RequestFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    fn client() -> PinataClient {
        PinataClient::new(
            "https://api.pinata.cloud/",
            "https://gateway.pinata.cloud/",
            "key",
            "secret",
        )
    }

    #[test]
    fn urls_trim_trailing_slashes() {
        let c = client();
        assert_eq!(
            c.endpoint("pinFileToIPFS"),
            "https://api.pinata.cloud/pinning/pinFileToIPFS"
        );
        let hash = ContentHash::parse(CID).unwrap();
        assert_eq!(
            c.gateway_url(&hash),
            format!("https://gateway.pinata.cloud/ipfs/{CID}")
        );
    }

    #[test]
    fn pin_response_field_name() {
        let resp: PinResponse =
            serde_json::from_str(&format!(r#"{{"IpfsHash":"{CID}","PinSize":12}}"#)).unwrap();
        assert_eq!(parse_pin_hash(&resp.ipfs_hash).unwrap().as_str(), CID);
    }

    #[test]
    fn malformed_hash_is_invalid_response() {
        assert!(matches!(
            parse_pin_hash("not-a-cid"),
            Err(IpfsError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn empty_file_is_refused_locally() {
        let err = client().pin_file("empty.pdf", Vec::new()).await.unwrap_err();
        assert!(matches!(err, IpfsError::EmptyUpload));
    }

    #[tokio::test]
    async fn unreachable_service_is_reported() {
        let c = PinataClient::with_timeout(
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
            "k",
            "s",
            Duration::from_millis(200),
        );
        let err = c.pin_file("doc.pdf", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(
            err,
            IpfsError::Unreachable(_) | IpfsError::RequestFailed(_)
        ));
    }
}
