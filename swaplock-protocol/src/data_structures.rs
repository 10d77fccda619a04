// Core value types shared across the escrow protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Chain identifiers follow the usual numeric convention (1, 10, ...).
pub type ChainId = u64;

// Asset quantities. The ledger model tracks whole units only.
pub type Amount = u64;

/// A 20-byte account or contract address, displayed as 0x-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    // Convenient constructor for tests and demos: the value lands in the
    // low-order bytes, the rest stay zero.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address literal: {0}")]
pub struct AddressParseError(String);

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(stripped).map_err(|_| AddressParseError(s.to_string()))?;
        if raw.len() != 20 {
            return Err(AddressParseError(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&raw);
        Ok(Address(bytes))
    }
}

/// Asset identifier on a single ledger. The zero address is the sentinel for
/// the ledger's native asset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(pub Address);

impl TokenId {
    pub const NATIVE: TokenId = TokenId(Address::ZERO);

    pub fn is_native(&self) -> bool {
        self.0 == Address::ZERO
    }

    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "TokenId(native)")
        } else {
            write!(f, "TokenId({})", self.0)
        }
    }
}

/// Opaque identifier of the parent swap order, assigned off-chain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderHash(pub [u8; 32]);

impl fmt::Debug for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderHash(0x{})", hex::encode(self.0))
    }
}

/// Commitment to a secret: the digest the matching secret must preimage to
/// unlock either escrow leg.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hashlock(pub [u8; 32]);

impl fmt::Debug for Hashlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hashlock(0x{})", hex::encode(self.0))
    }
}

/// The secret value unlocking a hashlock.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(pub [u8; 32]);

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret(0x{})", hex::encode(self.0))
    }
}

/// Hash over an escrow's full terms. Doubles as the deployment salt and the
/// escrow's externally verifiable identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn address_display_and_parse_round_trip() {
        let addr = Address::from_low_u64(0xdeadbeef);
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_parse_rejects_bad_input() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("not hex".parse::<Address>().is_err());
        // 21 bytes
        assert!("0x000000000000000000000000000000000000000000"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn address_equality_and_hash() {
        let a1 = Address::from_low_u64(1);
        let a2 = Address::from_low_u64(1);
        let a3 = Address::from_low_u64(2);
        assert_eq!(a1, a2);
        assert_ne!(a1, a3);

        let mut set = HashSet::new();
        set.insert(a1);
        set.insert(a2);
        set.insert(a3);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn native_token_sentinel() {
        assert!(TokenId::NATIVE.is_native());
        assert!(TokenId(Address::ZERO).is_native());
        assert!(!TokenId(Address::from_low_u64(7)).is_native());
    }
}
