//! Notification cycle orchestration.
//!
//! A cycle runs filter, authenticate, assemble and post strictly in that
//! order. [`Relay::process`] returns the typed result of the pipeline;
//! [`Relay::on_event`] is the host-facing boundary that logs every failure
//! (panics included) and never propagates it.

use crate::assembly::assemble;
use crate::config::RelayConfig;
use crate::errors::{RelayError, RelayResult};
use crate::observability::{create_cycle_span, record_error, record_success};
use crate::services::{
    AuthService, AuthServiceTrait, MessagesService, MessagesServiceTrait,
};
use crate::transport::{HttpTransport, JsonRestClient, ReqwestTransport};
use crate::types::IncomingEvent;
use futures::FutureExt;
use parking_lot::Mutex;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, error, info, Instrument};

/// Protocol step of a cycle, used to label failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Step {
    /// Nothing attempted yet
    #[default]
    Start,
    /// Login call issued against `uri`
    Authenticating {
        /// Absolute login URI
        uri: String,
    },
    /// Credential obtained
    Authenticated,
    /// Post call issued
    Posting,
    /// Message accepted
    Posted,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Start => f.write_str("Start"),
            Step::Authenticating { uri } => write!(f, "Will authenticate: {}", uri),
            Step::Authenticated => f.write_str("Done authenticate"),
            Step::Posting => f.write_str("Will post message"),
            Step::Posted => f.write_str("Done post message"),
        }
    }
}

/// Why a cycle stopped before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    /// The event's level is not in the allow-list
    LevelNotAllowed,
    /// No channel is configured
    NoChannel,
}

impl FilterReason {
    fn as_str(&self) -> &'static str {
        match self {
            FilterReason::LevelNotAllowed => "level_not_allowed",
            FilterReason::NoChannel => "no_channel",
        }
    }
}

/// Successful end of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The message was accepted by the chat server
    Posted,
    /// The event was skipped
    FilteredOut(FilterReason),
}

/// What the host boundary observed for one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The message was posted
    Posted,
    /// The event was skipped
    FilteredOut(FilterReason),
    /// The cycle failed; the failure has been logged
    Failed {
        /// Step active when the failure happened
        step: String,
        /// Stable error code
        error_code: &'static str,
        /// Rendered error
        message: String,
    },
}

impl CycleOutcome {
    /// Whether the cycle ended in a success state (posted or filtered out)
    pub fn is_success(&self) -> bool {
        !matches!(self, CycleOutcome::Failed { .. })
    }
}

impl From<Delivery> for CycleOutcome {
    fn from(delivery: Delivery) -> Self {
        match delivery {
            Delivery::Posted => CycleOutcome::Posted,
            Delivery::FilteredOut(reason) => CycleOutcome::FilteredOut(reason),
        }
    }
}

/// Step of the cycle in flight
#[derive(Debug, Default)]
struct StepTracker(Mutex<Step>);

impl StepTracker {
    fn enter(&self, step: Step) {
        debug!(step = %step, "Relay step");
        *self.0.lock() = step;
    }

    fn current(&self) -> String {
        self.0.lock().to_string()
    }
}

/// Relays events to a Rocket.Chat channel
pub struct Relay {
    config: RelayConfig,
    auth: Arc<dyn AuthServiceTrait>,
    messages: Arc<dyn MessagesServiceTrait>,
}

impl Relay {
    /// Create a relay talking HTTP with `reqwest`, bounded by the configured timeout
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a relay over a custom transport
    pub fn with_transport(config: RelayConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let client = JsonRestClient::new(transport, config.api_url().clone())
            .with_default_headers(config.default_headers.clone());

        let auth = Arc::new(AuthService::new(client.clone()));
        let messages = Arc::new(MessagesService::new(client));
        Self::with_services(config, auth, messages)
    }

    /// Create a relay over custom service implementations
    pub fn with_services(
        config: RelayConfig,
        auth: Arc<dyn AuthServiceTrait>,
        messages: Arc<dyn MessagesServiceTrait>,
    ) -> Self {
        Self {
            config,
            auth,
            messages,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Reason the event would be skipped, if any
    pub fn filter_reason(&self, event: &IncomingEvent) -> Option<FilterReason> {
        if !self.config.level_filter().allows(event.level) {
            return Some(FilterReason::LevelNotAllowed);
        }
        if !self.config.has_channel() {
            return Some(FilterReason::NoChannel);
        }
        None
    }

    /// Run one cycle and return its typed result.
    ///
    /// A failure is logged once, with the step it happened in, then
    /// returned.
    pub async fn process(&self, event: &IncomingEvent) -> RelayResult<Delivery> {
        let steps = StepTracker::default();
        let result = self.run(event, &steps).await;
        if let Err(e) = &result {
            log_failure(&steps.current(), e);
        }
        result
    }

    async fn run(&self, event: &IncomingEvent, steps: &StepTracker) -> RelayResult<Delivery> {
        if let Some(reason) = self.filter_reason(event) {
            debug!(reason = reason.as_str(), "Event filtered out");
            return Ok(Delivery::FilteredOut(reason));
        }

        steps.enter(Step::Authenticating {
            uri: self.auth.login_uri(),
        });
        let credential = self
            .auth
            .login(self.config.username(), self.config.password())
            .await?;
        steps.enter(Step::Authenticated);

        let message = assemble(event, &self.config, self.config.seq_url());

        steps.enter(Step::Posting);
        self.messages.post(&message, &credential).await?;
        steps.enter(Step::Posted);

        info!(
            channel = %message.channel,
            attachments = message.attachments.len(),
            "Message posted to Rocket.Chat"
        );
        Ok(Delivery::Posted)
    }

    /// Relay one event, absorbing every failure.
    ///
    /// Errors and panics raised anywhere in the cycle are logged with the
    /// last recorded step. The returned outcome is informational; the host
    /// may ignore it.
    pub async fn on_event(&self, event: &IncomingEvent) -> CycleOutcome {
        let span = create_cycle_span(event);
        let steps = StepTracker::default();

        let result = AssertUnwindSafe(self.run(event, &steps))
            .catch_unwind()
            .instrument(span.clone())
            .await
            .unwrap_or_else(|payload| Err(RelayError::from_panic(payload)));

        span.in_scope(|| match result {
            Ok(delivery) => {
                record_success(
                    &span,
                    match &delivery {
                        Delivery::Posted => "posted",
                        Delivery::FilteredOut(_) => "filtered_out",
                    },
                );
                delivery.into()
            }
            Err(e) => {
                let step = steps.current();
                log_failure(&step, &e);
                record_error(&span, &e.to_string());
                failed(step, &e)
            }
        })
    }

    /// Relay one event from synchronous code.
    ///
    /// Blocks until the cycle completes. Outside any runtime the cycle runs
    /// on a dedicated current-thread runtime. On a thread of a multi-thread
    /// runtime it runs in place on that runtime. A current-thread runtime
    /// cannot be blocked, so the cycle is reported as failed instead.
    pub fn on_event_blocking(&self, event: &IncomingEvent) -> CycleOutcome {
        if let Ok(handle) = Handle::try_current() {
            return match handle.runtime_flavor() {
                RuntimeFlavor::CurrentThread => fail_before_start(
                    "cannot block inside a current-thread runtime; use on_event".to_string(),
                ),
                _ => tokio::task::block_in_place(|| handle.block_on(self.on_event(event))),
            };
        }

        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.on_event(event)),
            Err(e) => fail_before_start(format!("failed to start runtime: {}", e)),
        }
    }
}

/// Log a failed cycle with the step it stopped in
fn log_failure(step: &str, e: &RelayError) {
    match e {
        RelayError::Authentication(_) => error!(
            step = %step,
            error = %e,
            error_code = e.error_code(),
            "Rocket.Chat authentication failure"
        ),
        RelayError::PostMessage(rejection) => error!(
            step = %step,
            error = %rejection.error,
            error_code = e.error_code(),
            "Rocket.Chat post message failure"
        ),
        _ => error!(
            step = %step,
            error = %e,
            error_code = e.error_code(),
            "Error while sending message to Rocket.Chat"
        ),
    }
}

fn failed(step: String, e: &RelayError) -> CycleOutcome {
    CycleOutcome::Failed {
        step,
        error_code: e.error_code(),
        message: e.to_string(),
    }
}

fn fail_before_start(message: String) -> CycleOutcome {
    let e = RelayError::Unexpected { message };
    let step = Step::Start.to_string();
    log_failure(&step, &e);
    failed(step, &e)
}

impl fmt::Debug for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relay")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
