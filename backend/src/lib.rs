//! Hotel management backend: domain services, HTTP adapters and Diesel
//! persistence.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
