//! Core SMTP types.

mod address;
pub mod headers;
mod reply;

pub use address::Address;
pub use headers::HeaderSet;
pub use reply::{Reply, ReplyCode};
