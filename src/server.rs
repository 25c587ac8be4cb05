//! HTTP surface exposing the assignment engine.
//!
//! # Protocol
//! - POST /eligibility/assign - Assign voter records across proposals
//! - POST /eligibility/unassign - Remove voter records across proposals
//! - GET /health - Health check endpoint
//!
//! Both POST endpoints accept an optional JSON body
//! `{"proposalIds": [..], "concurrency": n}`.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::ballotsmith::{BallotSmith, RunReport, RunRequest};
use crate::error::EngineError;
use crate::types::{Mode, ProposalOutcome};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    message: String,
    results: ApiResults,
    processing_details: ProcessingDetails,
}

#[derive(Serialize)]
struct ApiResults {
    success: usize,
    failed: usize,
    details: Vec<ApiDetail>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiDetail {
    id: u64,
    title: String,
    voters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped_voters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_voters: Option<usize>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessingDetails {
    concurrency_level: usize,
    execution_time_seconds: f64,
}

#[derive(Serialize)]
struct ApiError {
    error: &'static str,
    details: String,
}

impl From<&ProposalOutcome> for ApiDetail {
    fn from(outcome: &ProposalOutcome) -> Self {
        ApiDetail {
            id: outcome.proposal_id,
            title: outcome.title.clone(),
            voters: outcome.voters_processed,
            skipped_voters: outcome.skipped,
            total_voters: outcome.total,
            status: if outcome.success { "success" } else { "failed" },
            error: outcome.error.clone(),
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> Response<Body> {
    let body = serde_json::to_vec(payload).unwrap_or_else(|_| b"{}".to_vec());
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn report_response(report: &RunReport) -> Response<Body> {
    let payload = ApiResponse {
        message: format!(
            "{} processing finished for {} proposals",
            report.mode.as_str(),
            report.summary.details.len()
        ),
        results: ApiResults {
            success: report.summary.success,
            failed: report.summary.failed,
            details: report.summary.details.iter().map(ApiDetail::from).collect(),
        },
        processing_details: ProcessingDetails {
            concurrency_level: report.concurrency,
            execution_time_seconds: report.elapsed_seconds,
        },
    };
    json_response(StatusCode::OK, &payload)
}

async fn handle_run(
    app: Arc<BallotSmith>,
    mode: Mode,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let bytes = match hyper::body::to_bytes(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("failed to read request body: {}", e);
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                &ApiError { error: "invalid_body", details: e.to_string() },
            ));
        }
    };

    let request: RunRequest = if bytes.is_empty() {
        RunRequest::default()
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(request) => request,
            Err(e) => {
                return Ok(json_response(
                    StatusCode::BAD_REQUEST,
                    &ApiError { error: "invalid_json", details: e.to_string() },
                ));
            }
        }
    };

    match app.run(mode, request).await {
        Ok(report) => Ok(report_response(&report)),
        Err(EngineError::Precondition(details)) => Ok(json_response(
            StatusCode::BAD_REQUEST,
            &ApiError { error: "precondition_failed", details },
        )),
        Err(err) => Ok(json_response(
            StatusCode::BAD_GATEWAY,
            &ApiError { error: "run_failed", details: err.to_string() },
        )),
    }
}

async fn handle_request(
    app: Arc<BallotSmith>,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    debug!("HTTP request: {} {}", method, path);

    match (method, path) {
        (&Method::GET, "/health") => Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Body::from(r#"{"status":"ok"}"#))
            .unwrap()),

        (&Method::POST, "/eligibility/assign") => handle_run(app, Mode::Assign, req).await,
        (&Method::POST, "/eligibility/unassign") => handle_run(app, Mode::Unassign, req).await,

        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from(r#"{"error":"not_found"}"#))
            .unwrap()),
    }
}

/// Bind the API server; returns the bound address and the serve future.
pub fn bind(
    app: Arc<BallotSmith>,
    addr: &str,
) -> Result<(SocketAddr, impl Future<Output = Result<()>>)> {
    let socket_addr: SocketAddr = addr.parse().with_context(|| format!("bad listen address {}", addr))?;

    let make_svc = make_service_fn(move |_conn| {
        let app = Arc::clone(&app);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| handle_request(Arc::clone(&app), req)))
        }
    });

    let server = Server::try_bind(&socket_addr)
        .with_context(|| format!("binding {}", socket_addr))?
        .serve(make_svc);
    let bound = server.local_addr();

    Ok((bound, async move { server.await.context("API server") }))
}

/// Run the API server until it exits.
pub async fn serve(app: BallotSmith, addr: &str) -> Result<()> {
    let (bound, server) = bind(Arc::new(app), addr)?;
    info!("API listening on http://{}", bound);
    server.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::committee::{CommitteeSourceVariant, MockSource, Resolver};
    use crate::config::BaseConfig;
    use crate::directory::{DirectoryVariant, MockDirectory};
    use crate::ledger::{LedgerVariant, MockLedger};
    use crate::operator::Operator;
    use crate::types::{Address, CommitteeMember, CommitteeSnapshot, ProposalTarget, ADDRESS_LEN};

    fn member(id: u8) -> CommitteeMember {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = id;
        CommitteeMember { address: Address::new(bytes), votes: id as u64 }
    }

    fn test_app(operator: Option<Operator>, targets: Vec<ProposalTarget>) -> BallotSmith {
        let members: Vec<CommitteeMember> = (1..=10).map(member).collect();
        let snapshot = CommitteeSnapshot {
            id: "c1".to_string(),
            members,
        };
        BallotSmith::new(
            DirectoryVariant::Mock(MockDirectory::new(targets)),
            Resolver::new(vec![CommitteeSourceVariant::Mock(MockSource::new(vec![snapshot]))]),
            LedgerVariant::Mock(MockLedger::new()),
            operator,
            BaseConfig::default(),
        )
    }

    fn target(id: u64) -> ProposalTarget {
        ProposalTarget { id, title: format!("proposal {}", id), snapshot_id: "c1".to_string() }
    }

    async fn start(app: BallotSmith) -> SocketAddr {
        let (addr, server) = bind(Arc::new(app), "127.0.0.1:0").unwrap();
        tokio::spawn(server);
        addr
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let addr = start(test_app(None, vec![])).await;
        let client = hyper::Client::new();
        let response = client
            .get(format!("http://{}/health", addr).parse().unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_operator_is_a_precondition_failure() {
        let addr = start(test_app(None, vec![target(1)])).await;
        let client = hyper::Client::new();
        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("http://{}/eligibility/assign", addr))
            .body(Body::empty())
            .unwrap();

        let response = client.request(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["error"], "precondition_failed");
    }

    #[tokio::test]
    async fn assign_endpoint_reports_results() {
        let operator = Operator::from_mnemonic("vault sketch ladder").unwrap();
        let addr = start(test_app(Some(operator), vec![target(1)])).await;
        let client = hyper::Client::new();
        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("http://{}/eligibility/assign", addr))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"concurrency": 2}"#))
            .unwrap();

        let response = client.request(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["results"]["success"], 1);
        assert_eq!(parsed["results"]["failed"], 0);
        assert_eq!(parsed["results"]["details"][0]["voters"], 10);
        assert_eq!(parsed["processingDetails"]["concurrencyLevel"], 2);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let addr = start(test_app(None, vec![])).await;
        let client = hyper::Client::new();
        let response = client
            .get(format!("http://{}/nonexistent", addr).parse().unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
