// Deterministic derivation of escrow deployment addresses. The address is a
// pure function of the terms commitment and a fixed template hash, so any
// observer can compute where an escrow will live before it exists, and the
// factory gets at-most-one-escrow-per-commitment by refusing occupied slots.

use crate::data_structures::{Address, Commitment};
use crate::escrow::EscrowKind;
use sha2::{Digest, Sha256};

/// Fixed hash identifying the escrow template for one side of the swap.
/// Plays the role a proxy bytecode hash plays on a real ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TemplateHash(pub [u8; 32]);

// Domain tags keep escrow slots disjoint from every other hash in the
// protocol and the two templates disjoint from each other.
const ADDRESS_DOMAIN: &[u8] = b"swaplock/escrow-slot/v1";
const SRC_TEMPLATE_TAG: &[u8] = b"swaplock/escrow-src-template/v1";
const DST_TEMPLATE_TAG: &[u8] = b"swaplock/escrow-dst-template/v1";

/// Precomputed template hash for `kind`.
pub fn template_hash(kind: EscrowKind) -> TemplateHash {
    let tag = match kind {
        EscrowKind::Src => SRC_TEMPLATE_TAG,
        EscrowKind::Dst => DST_TEMPLATE_TAG,
    };
    TemplateHash(Sha256::digest(tag).into())
}

/// The address the deployment step will produce for this commitment and
/// template, bit-for-bit.
pub fn derive_address(commitment: Commitment, template: TemplateHash) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    hasher.update(template.0);
    hasher.update(commitment.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    Address(out)
}
