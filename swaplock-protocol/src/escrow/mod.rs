// Escrow-side modules: the immutable terms, the packed timelocks, and the
// deployed instance state machine.

pub mod immutables;
pub mod instance;
pub mod timelocks;

pub use immutables::{DstImmutablesComplement, Immutables};
pub use instance::{Escrow, EscrowKind, EscrowState, Payout};
pub use timelocks::{Stage, Timelocks};
