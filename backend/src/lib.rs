//! Kudos ledger backend: peer-recognition credits with monthly allotments,
//! endorsements, and voucher redemption.
//!
//! - [`domain`] holds the ledger rules and ports.
//! - [`inbound`] exposes them over HTTP.
//! - [`outbound`] stores them in PostgreSQL or in memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
