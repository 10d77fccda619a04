// Coordination core for cross-chain atomic swaps: hash-locked, time-locked
// escrows whose identity is derived from their terms, created by a factory
// that validates payment, deploys at the derived address and publishes the
// commitment for independent counterpart-side verification.

pub mod access;
pub mod config;
pub mod crypto;
pub mod data_structures;
pub mod error;
pub mod escrow;
pub mod events;
pub mod factory;
pub mod ledger;
pub mod partial_fill;
pub mod watcher;

pub mod test_utils; // Shared fixtures for unit and integration tests
