//! Port implementations.

mod hyper_client;
mod system;

pub use hyper_client::HyperHttpClient;
pub use system::{OsRngIdSource, SystemClock};
