//! Paillier key generation, encryption and homomorphic operations, plus a
//! NIZK that the modulus was honestly generated.
//!
//! Consumed by the downstream threshold-ECDSA signing protocol, which
//! this crate does not implement; it only produces the key pair and the
//! proof.

pub mod bigint;
pub mod nizk;

use self::bigint::BigInt;
use paillier::{
    Add, Decrypt, Encrypt, EncryptionKey, KeyGeneration, Mul, Paillier, RawCiphertext,
    RawPlaintext,
};
pub use paillier::DecryptionKey;

/// Bit length used by [`generate_keypair`]'s default call site; callers
/// may pass a different size explicitly.
pub const DEFAULT_MODULUS_BITS: usize = 2048;

/// An encrypted value. Opaque wire form is the underlying big integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext(pub BigInt);

/// Samples a fresh Paillier key pair with an `n`-bit modulus.
pub fn generate_keypair(modulus_bits: usize) -> (EncryptionKey, DecryptionKey) {
    Paillier::keypair_with_modulus_size(modulus_bits).keys()
}

/// `(1 + mN) * r^N mod N^2`, with `r` sampled uniformly from `Z*_N`.
pub fn encrypt(ek: &EncryptionKey, m: &BigInt) -> Ciphertext {
    let encrypted = Paillier::encrypt(ek, RawPlaintext::from(m.clone()));
    Ciphertext(encrypted.0.into_owned())
}

pub fn decrypt(dk: &DecryptionKey, c: &Ciphertext) -> BigInt {
    let decrypted = Paillier::decrypt(dk, RawCiphertext::from(c.0.clone()));
    decrypted.0.into_owned()
}

/// Homomorphic addition: `Dec(add(c1, c2)) = Dec(c1) + Dec(c2) mod N`.
pub fn add(ek: &EncryptionKey, c1: &Ciphertext, c2: &Ciphertext) -> Ciphertext {
    let sum = Paillier::add(
        ek,
        RawCiphertext::from(c1.0.clone()),
        RawCiphertext::from(c2.0.clone()),
    );
    Ciphertext(sum.0.into_owned())
}

/// Homomorphic scalar multiplication: `Dec(scalar_mul(c, k)) = k * Dec(c) mod N`.
pub fn scalar_mul(ek: &EncryptionKey, c: &Ciphertext, k: &BigInt) -> Ciphertext {
    let product = Paillier::mul(ek, RawCiphertext::from(c.0.clone()), RawPlaintext::from(k.clone()));
    Ciphertext(product.0.into_owned())
}
