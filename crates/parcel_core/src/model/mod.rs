//! Parcel domain model.
//!
//! # Responsibility
//! - Define the shipment record persisted by the repository layer.
//! - Name the lifecycle states that guard mutation.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused.
//! - Deletion is physical; there is no tombstone state.

pub mod parcel;
