// Error taxonomy for the creation path and the ledger model.
//
// Creation is all-or-nothing: every variant here is raised before the first
// state mutation of the failing operation, so a caller that sees an error can
// assume nothing was created and no funds moved.

use crate::data_structures::{Address, Amount, TokenId};
use thiserror::Error;

/// Failures of the underlying ledger primitives (balances, allowances,
/// deployment slots).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient native balance for {account}: need {required}, have {available}")]
    InsufficientNativeBalance {
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error("insufficient balance of {token:?} for {account}: need {required}, have {available}")]
    InsufficientTokenBalance {
        token: TokenId,
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error("allowance from {owner} to {spender} for {token:?} too low: need {required}, have {available}")]
    InsufficientAllowance {
        token: TokenId,
        owner: Address,
        spender: Address,
        required: Amount,
        available: Amount,
    },

    #[error("address {0} already holds deployed code")]
    AddressOccupied(Address),

    #[error("no escrow deployed at {0}")]
    UnknownEscrow(Address),
}

/// Failures of escrow creation and of the deployed instances.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// The attached native value does not exactly equal the required total
    /// (safety deposit, plus the amount when the locked asset is native).
    #[error("attached native value {provided} does not match required {required}")]
    InsufficientEscrowBalance { required: Amount, provided: Amount },

    /// The derived deployment slot is already occupied: a field-identical
    /// commitment was deployed before.
    #[error("an escrow for this commitment already exists at {0}")]
    EscrowAlreadyExists(Address),

    /// A destination escrow whose cancellation window would open after the
    /// source side's cancellation cannot safely exist.
    #[error("destination cancellation at {dst_cancellation} starts after source cancellation at {src_cancellation}")]
    InvalidCreationTime {
        dst_cancellation: u64,
        src_cancellation: u64,
    },

    #[error("timelock offsets are not monotonic within their phase order")]
    InvalidTimelocks,

    #[error("action attempted outside its time window")]
    InvalidTime,

    #[error("caller {0} is not authorized for this action")]
    InvalidCaller(Address),

    #[error("presented secret does not match the hashlock")]
    InvalidSecret,

    #[error("escrow has already reached a terminal state")]
    NotActive,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
