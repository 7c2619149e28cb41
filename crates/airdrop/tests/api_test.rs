//! Router-level tests for the airdrop HTTP API

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use rusd_airdrop::api;
use rusd_airdrop::{
    AirdropConfig, AirdropResult, AirdropService, MintInvoker, MintOutcome, WalletAddress,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const WALLET: &str = "11111111111111111111111111111111";

struct StaticInvoker {
    outcome: MintOutcome,
    calls: AtomicUsize,
}

impl StaticInvoker {
    fn new(outcome: MintOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MintInvoker for StaticInvoker {
    async fn invoke(&self, _wallet: &WalletAddress, _amount: f64) -> AirdropResult<MintOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

fn app(invoker: Arc<StaticInvoker>) -> Router {
    rusd_common::utils::logging::init_test_logging();
    let service = AirdropService::new(AirdropConfig::default(), invoker).unwrap();
    api::router(Arc::new(service))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_airdrop(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/airdrop")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn signing_invoker() -> Arc<StaticInvoker> {
    StaticInvoker::new(MintOutcome::Success {
        stdout: "Transaction signature: 5abcXYZ\n".to_string(),
    })
}

#[tokio::test]
async fn test_health() {
    let app = app(signing_invoker());
    let (status, body) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "rUSD Airdrop Server");
    assert_eq!(body["airdrop_amount"].as_u64(), Some(50));
    assert_eq!(body["cooldown_hours"].as_u64(), Some(24));
    assert_eq!(body["airdrop_amount"].to_string(), "50");
}

#[tokio::test]
async fn test_airdrop_then_cooldown() {
    let invoker = signing_invoker();
    let app = app(invoker.clone());

    let (status, body) = send(&app, post_airdrop(json!({ "wallet_address": WALLET, "amount": 150 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["signature"], "5abcXYZ");
    assert_eq!(body["amount"], 50.0);
    assert_eq!(body["wallet_address"], WALLET);

    let (status, body) = send(&app, post_airdrop(json!({ "wallet_address": WALLET }))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "COOLDOWN_ACTIVE");
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Airdrop cooldown active. Please wait 24.0"), "{}", detail);

    assert_eq!(invoker.calls.load(Ordering::SeqCst), 1);

    let (status, body) = send(&app, get(&format!("/history/{}", WALLET))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wallet_address"], WALLET);
    assert_eq!(body["can_request"], false);
    assert!(body["last_airdrop"].is_string());
    assert!(body["cooldown_remaining_hours"].as_f64().unwrap() > 23.9);
}

#[tokio::test]
async fn test_malformed_wallet_is_bad_request() {
    let invoker = signing_invoker();
    let app = app(invoker.clone());

    let (status, body) = send(&app, post_airdrop(json!({ "wallet_address": "abc" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid wallet address format");
    assert_eq!(invoker.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout_is_gateway_timeout_and_not_recorded() {
    let app = app(StaticInvoker::new(MintOutcome::Timeout));

    let (status, body) = send(&app, post_airdrop(json!({ "wallet_address": WALLET }))).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "SUBPROCESS_TIMEOUT");

    let (_, body) = send(&app, get(&format!("/history/{}", WALLET))).await;
    assert_eq!(body["can_request"], true);
    assert!(body["last_airdrop"].is_null());
}

#[tokio::test]
async fn test_missing_signature_is_server_error_and_not_recorded() {
    let app = app(StaticInvoker::new(MintOutcome::Success {
        stdout: "all done\n".to_string(),
    }));

    let (status, body) = send(&app, post_airdrop(json!({ "wallet_address": WALLET }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Could not extract transaction signature from output");

    let (_, body) = send(&app, get(&format!("/history/{}", WALLET))).await;
    assert_eq!(body["can_request"], true);
}

#[tokio::test]
async fn test_process_failure_passes_stderr() {
    let app = app(StaticInvoker::new(MintOutcome::ProcessFailure {
        exit_code: Some(1),
        stderr: "Error: Invalid public key input".to_string(),
    }));

    let (status, body) = send(&app, post_airdrop(json!({ "wallet_address": WALLET }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Failed to mint tokens: Error: Invalid public key input");
}

#[tokio::test]
async fn test_history_for_unknown_wallet() {
    let app = app(signing_invoker());

    let (status, body) = send(&app, get("/history/neverseen")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "wallet_address": "neverseen",
            "last_airdrop": null,
            "can_request": true,
            "cooldown_remaining_hours": 0.0
        })
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = app(signing_invoker());
    send(&app, post_airdrop(json!({ "wallet_address": WALLET }))).await;

    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("rusd_airdrop_dispatches_total 1"));
}
