use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Client, StatusCode};

use super::CommitteePayload;
use crate::traits::CommitteeSource;
use crate::types::{CommitteeSnapshot, SnapshotId};

/// Remote committee source; fallback when the bundle does not carry the
/// snapshot.
pub struct HttpSource {
    base_url: String,
    client: Client<HttpConnector>,
}

impl HttpSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl CommitteeSource for HttpSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self, id: &SnapshotId) -> Result<Option<CommitteeSnapshot>> {
        let uri = format!("{}/{}.json", self.base_url, id);
        let response = self
            .client
            .get(uri.parse().with_context(|| format!("bad committee uri {}", uri))?)
            .await
            .with_context(|| format!("fetching committee from {}", uri))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bytes = hyper::body::to_bytes(response.into_body())
                    .await
                    .context("reading committee response body")?;
                let payload: CommitteePayload = serde_json::from_slice(&bytes)
                    .with_context(|| format!("parsing committee payload from {}", uri))?;
                Ok(Some(CommitteeSnapshot { id: id.clone(), members: payload.members }))
            }
            status => bail!("committee endpoint returned {} for {}", status, uri),
        }
    }
}
