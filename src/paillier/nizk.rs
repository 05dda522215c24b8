//! Gennaro–Micciancio-style NIZK that a Paillier modulus `N` was generated
//! with a known `Phi(N)`, i.e. that `N` is (with overwhelming probability)
//! the product of two primes rather than some adversarially chosen
//! composite.
//!
//! Soundness error is `2^-k`; `k` challenges are derived deterministically
//! from `H(N)` so the proof is non-interactive.

use super::bigint::{BigInt, Converter, Modulo, One, Zero};
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};

/// Soundness parameter: must be at least 11 for adequate soundness.
pub const SOUNDNESS_K: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellFormedProof {
    sigmas: Vec<BigInt>,
}

/// Proves that `n` was generated with totient `phi`.
///
/// `phi` must be coprime to `n` (true for any RSA-style modulus); returns
/// [`Error::Config`] if it is not, since no modular inverse of `n` exists
/// modulo `phi` in that case and the proof cannot be constructed.
pub fn prove(n: &BigInt, phi: &BigInt) -> Result<WellFormedProof> {
    let n_inv_mod_phi = BigInt::mod_inv(n, phi)
        .ok_or(Error::Config("paillier modulus is not invertible modulo its totient"))?;

    let challenges = derive_challenges(n);
    let sigmas = challenges
        .iter()
        .map(|rho| BigInt::mod_pow(rho, &n_inv_mod_phi, n))
        .collect();
    Ok(WellFormedProof { sigmas })
}

/// Verifies `proof` against the public modulus `n`: `sigma_j^N == rho_j mod N`
/// for every challenge `rho_j` re-derived from `H(N)`.
pub fn verify(n: &BigInt, proof: &WellFormedProof) -> Result<()> {
    if proof.sigmas.len() != SOUNDNESS_K {
        return Err(Error::ProofInvalid("paillier well-formedness proof has the wrong length"));
    }

    let challenges = derive_challenges(n);
    for (sigma, rho) in proof.sigmas.iter().zip(challenges.iter()) {
        if BigInt::mod_pow(sigma, n, n) != *rho {
            return Err(Error::ProofInvalid("paillier well-formedness proof failed to verify"));
        }
    }
    Ok(())
}

/// `rho_j = H(N ‖ j)` reduced into `Z*_N`, resampling on the (negligible)
/// chance of hitting zero.
fn derive_challenges(n: &BigInt) -> Vec<BigInt> {
    let n_bytes = n.to_bytes();
    (0..SOUNDNESS_K as u32)
        .map(|j| {
            let mut attempt = 0u32;
            loop {
                let mut hasher = Sha256::new();
                hasher.update(&n_bytes);
                hasher.update(j.to_be_bytes());
                hasher.update(attempt.to_be_bytes());
                let digest: [u8; 32] = hasher.finalize().into();
                let candidate = BigInt::from_bytes(&digest) % n.clone();
                if candidate != BigInt::zero() {
                    return candidate;
                }
                attempt += 1;
            }
        })
        .collect()
}
