//! SHA-256 hash commitment for the DKG/refresh commit-then-reveal rounds.
//!
//! The committed message is a sequence of byte strings rather than a
//! sequence of scalars: the DKG/refresh opening binds both scalars
//! (chaincode) and point coordinates (Feldman verifiers), and the latter
//! live in the curve's base field, not its scalar field — reducing them
//! mod the group order before hashing would silently change the value
//! being committed to.

use crate::crypto::Rng;
use crate::error::{Error, Result};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// A 32-byte hash commitment.
pub type Commitment = [u8; 32];

/// The opened message: a random witness followed by the byte strings the
/// caller chose to bind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opening {
    pub witness: [u8; 32],
    pub message: Vec<Vec<u8>>,
}

/// Samples a random witness and commits to `message`.
///
/// `C = SHA-256(witness ‖ len(message[0]) ‖ message[0] ‖ …)`, each entry
/// length-prefixed by a single byte so no ambiguity arises from
/// variable-width encodings.
pub fn commit(message: Vec<Vec<u8>>, rng: &mut Rng) -> (Commitment, Opening) {
    let mut witness = [0u8; 32];
    rng.fill_bytes(&mut witness);
    let opening = Opening { witness, message };
    (hash_opening(&opening), opening)
}

/// Recomputes the hash of `opening` and compares it to `commitment`.
pub fn open(commitment: &Commitment, opening: &Opening) -> Result<()> {
    if hash_opening(opening) == *commitment {
        Ok(())
    } else {
        Err(Error::CommitmentMismatch)
    }
}

fn hash_opening(opening: &Opening) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(opening.witness);
    for entry in &opening.message {
        hasher.update((entry.len() as u32).to_be_bytes());
        hasher.update(entry);
    }
    hasher.finalize().into()
}
