// The canonical terms of one escrow leg, and the commitment hash that names
// its deployment slot.

use crate::data_structures::{Address, Amount, ChainId, Commitment, Hashlock, OrderHash, TokenId};
use crate::escrow::timelocks::Timelocks;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The full terms of an escrow. Immutable once hashed: any field change
/// produces a different commitment and therefore a different escrow identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Immutables {
    pub order_hash: OrderHash,
    pub hashlock: Hashlock,
    /// Address owed the destination asset.
    pub maker: Address,
    /// The resolver performing the swap on the maker's behalf.
    pub taker: Address,
    pub token: TokenId,
    pub amount: Amount,
    /// Native-asset incentive paid by the resolver, forfeit to whoever
    /// completes the unlock or cancel action.
    pub safety_deposit: Amount,
    pub timelocks: Timelocks,
}

impl Immutables {
    /// Commitment over every field, computed from a canonical fixed-order
    /// byte encoding. No hidden state participates: equal field values always
    /// produce equal commitments, regardless of caller.
    pub fn commitment(&self) -> Commitment {
        let mut hasher = Sha256::new();
        hasher.update(self.order_hash.0);
        hasher.update(self.hashlock.0);
        hasher.update(self.maker.0);
        hasher.update(self.taker.0);
        hasher.update(self.token.0 .0);
        hasher.update(self.amount.to_be_bytes());
        hasher.update(self.safety_deposit.to_be_bytes());
        hasher.update(self.timelocks.pack());
        Commitment(hasher.finalize().into())
    }

    /// Native value that must accompany creation: the safety deposit, plus
    /// the locked amount itself when the asset is the native one.
    pub fn required_native(&self) -> Amount {
        if self.token.is_native() {
            self.safety_deposit + self.amount
        } else {
            self.safety_deposit
        }
    }
}

/// The subset of destination-side terms not already implied by the source
/// commitment. Published alongside it so an independent observer can
/// reconstruct the destination escrow's expected terms without trusting the
/// resolver.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DstImmutablesComplement {
    pub maker: Address,
    pub amount: Amount,
    pub token: TokenId,
    pub safety_deposit: Amount,
    pub chain_id: ChainId,
}
