//! HTTP transport for notification delivery
//!
//! The [`Transport`] trait is the seam between the notifier and the network.
//! [`HttpTransport`] is the reqwest implementation used in production; tests
//! substitute their own to observe outgoing requests.

pub mod http;
pub mod traits;

pub use http::HttpTransport;
pub use traits::{Transport, TransportResponse};
