//! # Sessions
//!
//! Connections opened through `/api/connect`, addressed by token.

mod errors;
mod registry;

pub use errors::{SessionError, SessionResult};
pub use registry::{Session, SessionRegistry};
