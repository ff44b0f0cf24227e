//! End-to-end cycles against a mock Rocket.Chat server.

use rocketchat_relay::fixtures::{self, responses};
use rocketchat_relay::{CycleOutcome, IncomingEvent, LogEventLevel, Relay, RelayConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

fn config(server: &MockServer, levels: &str) -> RelayConfig {
    RelayConfig::builder()
        .api_url(&format!("{}/api/v1", server.uri()))
        .expect("mock server URI is valid")
        .seq_url("seq.example.com")
        .channel("alerts")
        .event_levels(levels)
        .attach_properties(true)
        .username("relay-bot")
        .password("hunter2")
        .timeout(Duration::from_secs(5))
        .build()
        .expect("valid configuration")
}

async fn mount_login(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_json(json!({ "username": "relay-bot", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_event_is_relayed() {
    let server = setup_mock_server().await;
    mount_login(&server, responses::login_success("u1", "t1")).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat.postMessage"))
        .and(header("X-User-Id", "u1"))
        .and(header("X-Auth-Token", "t1"))
        .and(body_partial_json(json!({
            "channel": "#alerts",
            "text": "[boom](http://seq.example.com/#/events?filter=@Id%20%3D%20'e1')"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(responses::post_success()))
        .expect(1)
        .mount(&server)
        .await;

    let relay = Relay::new(config(&server, "")).expect("relay builds");
    let event = IncomingEvent::new("e1", LogEventLevel::Error, "boom").with_property("a", 1);

    assert_eq!(relay.on_event(&event).await, CycleOutcome::Posted);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].headers.contains_key("x-auth-token"));

    let posted: serde_json::Value = requests[1].body_json().expect("JSON body");
    assert_eq!(posted["attachments"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        posted["attachments"][1]["fields"],
        json!([{ "short": false, "title": "a", "value": "1" }])
    );
}

#[tokio::test]
async fn test_unauthorized_login_stops_the_cycle() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(responses::login_failure()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(responses::post_success()))
        .expect(0)
        .mount(&server)
        .await;

    let relay = Relay::new(config(&server, "")).expect("relay builds");
    let outcome = relay.on_event(&fixtures::event(LogEventLevel::Error)).await;

    match outcome {
        CycleOutcome::Failed { error_code, .. } => assert_eq!(error_code, "RELAY_AUTH"),
        other => panic!("expected authentication failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_post_rejection_reports_server_error() {
    let server = setup_mock_server().await;
    mount_login(&server, responses::login_success("u1", "t1")).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat.postMessage"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(responses::post_failure("error-room-not-found")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let relay = Relay::new(config(&server, "")).expect("relay builds");
    let outcome = relay.on_event(&fixtures::error_event()).await;

    match outcome {
        CycleOutcome::Failed {
            step,
            error_code,
            message,
        } => {
            assert_eq!(step, "Will post message");
            assert_eq!(error_code, "RELAY_POST_MESSAGE");
            assert!(message.contains("error-room-not-found"));
        }
        other => panic!("expected post failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_filtered_event_makes_no_request() {
    let server = setup_mock_server().await;

    let relay = Relay::new(config(&server, "Warning,Error")).expect("relay builds");
    let outcome = relay.on_event(&fixtures::event(LogEventLevel::Debug)).await;

    assert!(outcome.is_success());
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_slow_server_hits_timeout() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(responses::login_success("u1", "t1"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = RelayConfig::builder()
        .api_url(&format!("{}/api/v1", server.uri()))
        .expect("mock server URI is valid")
        .channel("alerts")
        .username("relay-bot")
        .password("hunter2")
        .timeout(Duration::from_millis(200))
        .build()
        .expect("valid configuration");

    let outcome = Relay::new(config)
        .expect("relay builds")
        .on_event(&fixtures::event(LogEventLevel::Error))
        .await;

    match outcome {
        CycleOutcome::Failed { step, error_code, .. } => {
            assert!(step.starts_with("Will authenticate: "));
            assert_eq!(error_code, "RELAY_AUTH");
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}
