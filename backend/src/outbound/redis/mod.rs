//! Redis adapters for the credential, session, and route store ports.
//!
//! All shared state lives in Redis: accounts as JSON records keyed by
//! canonical email, sessions as TTL hashes, saved routes as per-owner
//! hashes. Each adapter borrows a connection from the shared [`RedisPool`]
//! per operation and maps checkout failures onto its port's connection
//! error so callers can tell "store unreachable" from "query failed".

mod credential_store;
mod pool;
mod route_repository;
mod session_store;

pub use credential_store::RedisCredentialStore;
pub use pool::{PoolConfig, PoolError, RedisPool};
pub use route_repository::RedisRouteRepository;
pub use session_store::RedisSessionStore;
