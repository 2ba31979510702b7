//! Concord Types - Core type definitions for the Concord governance engine.
//!
//! This crate provides the identity primitives shared by the engine and its
//! collaborators:
//! - Addresses (20-byte, Bech32m encoded)
//! - Type-level errors

pub mod address;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use error::TypesError;
