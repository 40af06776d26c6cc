//! Multi-user todo service backend.
//!
//! Layout follows ports and adapters:
//! - [`domain`]: identities, todos, authorization and the services behind
//!   the driving ports.
//! - [`inbound`]: the actix-web HTTP adapter.
//! - [`outbound`]: PostgreSQL, in-memory and security adapters for the
//!   driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
