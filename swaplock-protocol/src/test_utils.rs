// Shared fixtures for unit and integration tests.

use crate::crypto::hashlock_of;
use crate::data_structures::{Address, Amount, ChainId, OrderHash, Secret, TokenId};
use crate::escrow::{Immutables, Timelocks};
use crate::ledger::Ledger;
use ed25519_dalek::SigningKey;

/// Deterministic signing key for a numeric test identity.
pub fn seeded_keypair(id: usize) -> SigningKey {
    let seed = [(id % 256) as u8; 32];
    SigningKey::from_bytes(&seed)
}

pub fn test_address(n: u64) -> Address {
    Address::from_low_u64(n)
}

/// Deterministic secret for a numeric test identity.
pub fn test_secret(n: u8) -> Secret {
    Secret([n; 32])
}

/// The schedule used across tests: src 10/120/900/1200, dst 10/120/600.
pub fn test_timelocks() -> Timelocks {
    Timelocks::new([10, 120, 900, 1200, 10, 120, 600])
}

/// Escrow terms bound to `secret`, with a fixed order hash and the standard
/// test schedule. The anchor is left unset; the factory stamps it.
pub fn immutables_for_secret(
    secret: Secret,
    maker: Address,
    taker: Address,
    token: TokenId,
    amount: Amount,
    safety_deposit: Amount,
) -> Immutables {
    Immutables {
        order_hash: OrderHash([0x42; 32]),
        hashlock: hashlock_of(&secret),
        maker,
        taker,
        token,
        amount,
        safety_deposit,
        timelocks: test_timelocks(),
    }
}

/// A ledger where `resolver` holds native units and `token` units, with the
/// token pre-approved to `factory` — the standard setup before a creation
/// call.
pub fn funded_swap_ledger(
    chain_id: ChainId,
    resolver: Address,
    token: TokenId,
    factory: Address,
) -> Ledger {
    let mut ledger = Ledger::new(chain_id, 1_000_000);
    ledger.mint_native(resolver, 1_000);
    if !token.is_native() {
        ledger.mint_token(token, resolver, 1_000);
        ledger.approve(resolver, factory, token, 1_000);
    }
    ledger
}
