// Cryptographic helpers: swap secrets and their hashlocks, plus the Ed25519
// primitives the resolver access layer signs with.

use crate::data_structures::{Hashlock, Secret};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

// Re-export key types for convenience
pub use ed25519_dalek::{SignatureError, SigningKey as SecretKey, VerifyingKey as PublicKey};

/// Generates a new Ed25519 keypair.
pub fn generate_keypair() -> SigningKey {
    let mut csprng = OsRng;
    SigningKey::generate(&mut csprng)
}

/// Signs a message using an Ed25519 secret key.
pub fn sign(message: &[u8], secret_key: &SigningKey) -> Signature {
    secret_key.sign(message)
}

/// Verifies an Ed25519 signature against a message and public key.
pub fn verify(message: &[u8], signature: &Signature, public_key: &VerifyingKey) -> bool {
    public_key.verify(message, signature).is_ok()
}

/// Draws a fresh random swap secret.
pub fn generate_secret() -> Secret {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Secret(bytes)
}

/// The hashlock committing to a secret: its SHA-256 digest.
pub fn hashlock_of(secret: &Secret) -> Hashlock {
    Hashlock(Sha256::digest(secret.0).into())
}
