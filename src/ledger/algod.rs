use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use serde::Deserialize;

use super::{PendingStatus, SignedAppCall, SuggestedParams};
use crate::traits::LedgerClient;

/// JSON-over-HTTP client for a ledger node.
#[derive(Clone)]
pub struct AlgodClient {
    base_url: String,
    token: String,
    client: Client<HttpConnector>,
}

#[derive(Deserialize)]
struct BoxDescriptor {
    /// Hex-encoded box name.
    name: String,
}

#[derive(Deserialize)]
struct BoxListing {
    boxes: Vec<BoxDescriptor>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    tx_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingResponse {
    confirmed_round: Option<u64>,
    pool_error: Option<String>,
}

impl AlgodClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }

    async fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let uri = format!("{}{}", self.base_url, path);
        let mut builder = Request::builder().method(method).uri(&uri);
        if !self.token.is_empty() {
            builder = builder.header("X-Algo-API-Token", &self.token);
        }
        let request = match body {
            Some(bytes) => builder
                .header("content-type", "application/json")
                .body(Body::from(bytes)),
            None => builder.body(Body::empty()),
        }
        .context("building ledger request")?;

        let response = self
            .client
            .request(request)
            .await
            .with_context(|| format!("ledger request to {}", uri))?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .context("reading ledger response body")?;

        if !status.is_success() {
            bail!(
                "ledger returned {} for {}: {}",
                status,
                uri,
                String::from_utf8_lossy(&bytes)
            );
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl LedgerClient for AlgodClient {
    fn name(&self) -> &'static str {
        "algod"
    }

    async fn suggested_params(&self) -> Result<SuggestedParams> {
        let bytes = self.request(Method::GET, "/v2/transactions/params", None).await?;
        serde_json::from_slice(&bytes).context("parsing suggested params")
    }

    async fn box_names(&self, app_id: u64) -> Result<Vec<Vec<u8>>> {
        let path = format!("/v2/applications/{}/boxes", app_id);
        let bytes = self.request(Method::GET, &path, None).await?;
        let listing: BoxListing = serde_json::from_slice(&bytes).context("parsing box listing")?;
        listing
            .boxes
            .into_iter()
            .map(|b| hex::decode(&b.name).map_err(|e| anyhow!("box name not hex: {}", e)))
            .collect()
    }

    async fn submit_group(&self, group: &[SignedAppCall]) -> Result<String> {
        let body = serde_json::to_vec(group).context("encoding transaction group")?;
        let bytes = self.request(Method::POST, "/v2/transactions", Some(body)).await?;
        let response: SubmitResponse =
            serde_json::from_slice(&bytes).context("parsing submit response")?;
        Ok(response.tx_id)
    }

    async fn pending_status(&self, txid: &str) -> Result<PendingStatus> {
        let path = format!("/v2/transactions/pending/{}", txid);
        let bytes = self.request(Method::GET, &path, None).await?;
        let response: PendingResponse =
            serde_json::from_slice(&bytes).context("parsing pending status")?;

        if let Some(reason) = response.pool_error.filter(|e| !e.is_empty()) {
            return Ok(PendingStatus::Rejected(reason));
        }
        Ok(match response.confirmed_round {
            Some(round) if round > 0 => PendingStatus::Confirmed(round),
            _ => PendingStatus::Pending,
        })
    }
}
