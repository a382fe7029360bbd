//! Connection identity model
//!
//! A [`Connection`] is derived from the identity fields of an inbound gateway
//! event. Construction is the only validation point: a connection without
//! region, api id, stage or connection id can never exist.

mod types;

pub use types::{build_connection, Connection, ConnectionContext, ConnectionError, Message};
