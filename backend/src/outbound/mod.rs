//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits for the infrastructure concerns the
//! service depends on:
//!
//! - **redis**: credential, session, and saved route stores over a shared
//!   connection pool
//! - **geo**: route scoring against the external geo-engine over HTTP
//! - **memory**: in-process equivalents for tests and local development
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod geo;
pub mod memory;
pub mod redis;
