use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::Client;

use crate::traits::ProposalDirectory;
use crate::types::{Mode, ProposalTarget};

/// Directory client querying an HTTP service for processable proposals.
pub struct HttpDirectory {
    base_url: String,
    client: Client<HttpConnector>,
}

impl HttpDirectory {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ProposalDirectory for HttpDirectory {
    fn name(&self) -> &'static str {
        "http-directory"
    }

    async fn current(&self, mode: Mode, ids: Option<&[u64]>) -> Result<Vec<ProposalTarget>> {
        let mut uri = format!("{}/proposals?phase={}", self.base_url, mode.as_str());
        if let Some(ids) = ids {
            let joined: Vec<String> = ids.iter().map(u64::to_string).collect();
            uri.push_str(&format!("&ids={}", joined.join(",")));
        }

        let response = self
            .client
            .get(uri.parse().with_context(|| format!("bad directory uri {}", uri))?)
            .await
            .with_context(|| format!("querying proposal directory at {}", uri))?;
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .context("reading directory response body")?;

        if !status.is_success() {
            bail!(
                "proposal directory returned {}: {}",
                status,
                String::from_utf8_lossy(&bytes)
            );
        }
        serde_json::from_slice(&bytes).context("parsing proposal listing")
    }
}
