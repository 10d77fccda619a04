// Resolver access validation. Creation and settlement are gated on who calls
// them, but the gate lives with the caller-facing layer, not inside the
// factory: the factory core stays agnostic of whitelisting policy.

use crate::crypto::{self, PublicKey};
use crate::data_structures::{Address, OrderHash};
use ed25519_dalek::Signature;
use std::collections::HashMap;

/// Decides whether a resolver may act on an order.
pub trait AccessValidator {
    fn is_authorized(&self, resolver: Address, order: &OrderHash, credential: &Signature) -> bool;
}

/// Whitelist of resolver signing keys. A request is authorized when the
/// credential is the resolver's signature over the order hash under its
/// registered key.
#[derive(Default)]
pub struct CredentialValidator {
    keys: HashMap<Address, PublicKey>,
}

impl CredentialValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resolver: Address, key: PublicKey) {
        self.keys.insert(resolver, key);
    }

    pub fn revoke(&mut self, resolver: &Address) {
        self.keys.remove(resolver);
    }
}

impl AccessValidator for CredentialValidator {
    fn is_authorized(&self, resolver: Address, order: &OrderHash, credential: &Signature) -> bool {
        match self.keys.get(&resolver) {
            Some(key) => crypto::verify(&order.0, credential, key),
            None => false,
        }
    }
}
