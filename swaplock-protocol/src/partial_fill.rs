// Partial-fill secret invalidation. When one order is split across several
// sub-escrows, each fill consumes one leaf of a merkle tree of secret
// hashlocks; a consumed leaf must never unlock a second escrow. The factory
// does not consult this layer itself: callers splitting an order gate on it
// before creating the next sub-escrow.

use crate::data_structures::{Hashlock, OrderHash};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartialFillError {
    #[error("order is not registered for partial fills")]
    UnknownOrder,

    #[error("merkle proof does not bind leaf {index} to the registered root")]
    InvalidProof { index: u64 },

    #[error("secret leaf {index} was already consumed")]
    LeafAlreadyUsed { index: u64 },
}

/// One sibling step of a merkle proof, innermost first. `right` is true when
/// the sibling sits to the right of the running hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProofNode {
    pub hash: [u8; 32],
    pub right: bool,
}

/// Marks individual secret leaves of an order as spent.
pub trait SecretInvalidator {
    fn invalidate(
        &mut self,
        order: OrderHash,
        index: u64,
        hashlock: Hashlock,
        proof: &[ProofNode],
    ) -> Result<(), PartialFillError>;
}

pub fn leaf_hash(index: u64, hashlock: &Hashlock) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"swaplock/secret-leaf/v1");
    hasher.update(index.to_be_bytes());
    hasher.update(hashlock.0);
    hasher.finalize().into()
}

pub fn node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Reference tracker: one registered root per order, one used-set of leaf
/// indices.
#[derive(Debug, Default)]
pub struct MerkleSecretTracker {
    roots: HashMap<OrderHash, [u8; 32]>,
    used: HashSet<(OrderHash, u64)>,
}

impl MerkleSecretTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_order(&mut self, order: OrderHash, root: [u8; 32]) {
        self.roots.insert(order, root);
    }

    pub fn is_used(&self, order: &OrderHash, index: u64) -> bool {
        self.used.contains(&(*order, index))
    }

    fn verify(root: [u8; 32], index: u64, hashlock: &Hashlock, proof: &[ProofNode]) -> bool {
        let mut running = leaf_hash(index, hashlock);
        for node in proof {
            running = if node.right {
                node_hash(&running, &node.hash)
            } else {
                node_hash(&node.hash, &running)
            };
        }
        running == root
    }
}

impl SecretInvalidator for MerkleSecretTracker {
    fn invalidate(
        &mut self,
        order: OrderHash,
        index: u64,
        hashlock: Hashlock,
        proof: &[ProofNode],
    ) -> Result<(), PartialFillError> {
        let root = self
            .roots
            .get(&order)
            .copied()
            .ok_or(PartialFillError::UnknownOrder)?;
        if !Self::verify(root, index, &hashlock, proof) {
            return Err(PartialFillError::InvalidProof { index });
        }
        if !self.used.insert((order, index)) {
            return Err(PartialFillError::LeafAlreadyUsed { index });
        }
        Ok(())
    }
}
