//! Authentication service: exchanges username/password for a session
//! credential.

mod requests;
mod responses;
mod service;

pub use requests::*;
pub use responses::*;
pub use service::*;
