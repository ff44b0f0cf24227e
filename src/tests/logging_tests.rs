//! Every failed cycle leaves exactly one ERROR record naming its step.

use super::log_capture::LogCapture;
use crate::config::{RelayConfig, RelayConfigBuilder};
use crate::fixtures::{self, responses};
use crate::mocks::{MockFailure, MockHttpTransport, MockResponse};
use crate::relay::{CycleOutcome, Relay};
use crate::types::LogEventLevel;
use std::sync::Arc;

const LOGIN_STEP: &str = "step=Will authenticate: https://chat.example.com/api/v1/login";
const POST_STEP: &str = "step=Will post message";

fn config() -> RelayConfig {
    RelayConfigBuilder::new()
        .api_url("https://chat.example.com/api/v1")
        .unwrap()
        .channel("alerts")
        .username("relay-bot")
        .password("hunter2")
        .build()
        .unwrap()
}

async fn run_cycle(responses: Vec<MockResponse>) -> (CycleOutcome, LogCapture) {
    let (capture, _guard) = LogCapture::install();
    let transport = Arc::new(MockHttpTransport::new().add_responses(responses));

    let outcome = Relay::with_transport(config(), transport)
        .on_event(&fixtures::event(LogEventLevel::Error))
        .await;

    (outcome, capture)
}

#[tokio::test]
async fn test_rejected_login_is_logged() {
    let (outcome, capture) = run_cycle(vec![MockResponse::json(responses::login_failure())]).await;

    assert!(!outcome.is_success());
    let record = capture.single_error();
    assert!(record.contains("Rocket.Chat authentication failure"), "{}", record);
    assert!(record.contains(LOGIN_STEP), "{}", record);
    assert!(record.contains("RELAY_AUTH"), "{}", record);
}

#[tokio::test]
async fn test_unsendable_token_is_logged_as_authentication_failure() {
    let (outcome, capture) = run_cycle(vec![
        MockResponse::json(responses::login_success("u1", "tok\nen")),
        MockResponse::json(responses::post_success()),
    ])
    .await;

    match outcome {
        CycleOutcome::Failed {
            step, error_code, ..
        } => {
            assert_eq!(step, "Will authenticate: https://chat.example.com/api/v1/login");
            assert_eq!(error_code, "RELAY_AUTH");
        }
        other => panic!("expected a failed cycle, got {:?}", other),
    }

    let record = capture.single_error();
    assert!(record.contains("Rocket.Chat authentication failure"), "{}", record);
    assert!(record.contains(LOGIN_STEP), "{}", record);
}

#[tokio::test]
async fn test_post_rejection_is_logged_with_server_error() {
    let (_, capture) = run_cycle(vec![
        MockResponse::json(responses::login_success("u1", "t1")),
        MockResponse::json(responses::post_failure("error-room-not-found")),
    ])
    .await;

    let record = capture.single_error();
    assert!(record.contains("Rocket.Chat post message failure"), "{}", record);
    assert!(record.contains(POST_STEP), "{}", record);
    assert!(record.contains("error=error-room-not-found"), "{}", record);
}

#[tokio::test]
async fn test_post_transport_failure_is_logged() {
    let (_, capture) = run_cycle(vec![
        MockResponse::json(responses::login_success("u1", "t1")),
        MockResponse::failure(MockFailure::Timeout),
    ])
    .await;

    let record = capture.single_error();
    assert!(record.contains("Error while sending message to Rocket.Chat"), "{}", record);
    assert!(record.contains(POST_STEP), "{}", record);
    assert!(record.contains("RELAY_NETWORK"), "{}", record);
}

#[tokio::test]
async fn test_captured_panic_is_logged() {
    let (_, capture) = run_cycle(vec![MockResponse::failure(MockFailure::Panic(
        "socket exploded".to_string(),
    ))])
    .await;

    let record = capture.single_error();
    assert!(record.contains("Error while sending message to Rocket.Chat"), "{}", record);
    assert!(record.contains(LOGIN_STEP), "{}", record);
    assert!(record.contains("socket exploded"), "{}", record);
}

#[tokio::test]
async fn test_process_logs_failures_once() {
    let (capture, _guard) = LogCapture::install();
    let transport = Arc::new(
        MockHttpTransport::new().add_response(MockResponse::json(responses::login_failure())),
    );

    let result = Relay::with_transport(config(), transport)
        .process(&fixtures::event(LogEventLevel::Error))
        .await;

    assert!(result.is_err());
    let record = capture.single_error();
    assert!(record.contains(LOGIN_STEP), "{}", record);
}

#[tokio::test]
async fn test_successful_cycle_logs_no_error() {
    let (outcome, capture) = run_cycle(vec![
        MockResponse::json(responses::login_success("u1", "t1")),
        MockResponse::json(responses::post_success()),
    ])
    .await;

    assert_eq!(outcome, CycleOutcome::Posted);
    assert!(capture.errors().is_empty());
}

#[tokio::test]
async fn test_blocking_entry_inside_current_thread_runtime_is_logged() {
    let (capture, _guard) = LogCapture::install();
    let transport = Arc::new(MockHttpTransport::new());

    let outcome = Relay::with_transport(config(), transport.clone())
        .on_event_blocking(&fixtures::event(LogEventLevel::Error));

    match outcome {
        CycleOutcome::Failed {
            step, error_code, ..
        } => {
            assert_eq!(step, "Start");
            assert_eq!(error_code, "RELAY_UNEXPECTED");
        }
        other => panic!("expected a failed cycle, got {:?}", other),
    }
    assert_eq!(transport.call_count(), 0);

    let record = capture.single_error();
    assert!(record.contains("Error while sending message to Rocket.Chat"), "{}", record);
    assert!(record.contains("step=Start"), "{}", record);
}
