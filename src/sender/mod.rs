//! Outbound push to gateway connections

mod gateway;
mod traits;

pub use gateway::{management_endpoint, ApiGatewaySender};
pub use traits::{MessageSender, SendError};
