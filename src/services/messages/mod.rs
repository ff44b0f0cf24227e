//! Messages service: posts an assembled chat message with a session
//! credential.

mod responses;
mod service;

pub use responses::*;
pub use service::*;
