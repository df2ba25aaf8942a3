//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed record stores using Diesel ORM
//! - **memory**: a process-local record store with the same transactional
//!   guarantees, used by tests and local runs
//! - **security**: bcrypt password hashing and HS256 bearer tokens
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
