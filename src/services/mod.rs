//! Rocket.Chat REST API services.
//!
//! Each service wraps one resource of the two-call protocol: `login`
//! produces a credential, `chat.postMessage` consumes it.

pub mod auth;
pub mod messages;

pub use auth::{AuthCredential, AuthService, AuthServiceTrait};
pub use messages::{MessagesService, MessagesServiceTrait, PostMessageResponse};
