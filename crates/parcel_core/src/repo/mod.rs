//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the parcel data access contract.
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Address changes and deletes only touch rows whose status is `registered`.
//! - Storage errors pass through unchanged inside `RepoError::Db`.

pub mod parcel_repo;
