//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local repositories for tests and database-less runs
//! - **security**: Argon2 credential codec and JWT token service
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod memory;
pub mod persistence;
pub mod security;
