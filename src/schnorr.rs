//! Non-interactive Schnorr proof of knowledge of a discrete log, made
//! non-interactive via Fiat–Shamir.

use crate::crypto::{ECPoint, ECScalar, Rng};
use crate::error::{Error, Result};
use sha2::{Digest, Sha256};

/// `(R, s)` for the statement `X = x*G`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof<P: ECPoint> {
    pub r: P,
    pub s: P::Scalar,
}

/// Proves knowledge of `x` such that `x = X` in the discrete-log sense.
pub fn prove<P: ECPoint>(x: &P::Scalar, capital_x: &P, rng: &mut Rng) -> Proof<P> {
    let r_scalar = P::Scalar::random(rng);
    let r = P::from_scalar(&r_scalar);
    let e = challenge::<P>(&r, capital_x);
    let s = r_scalar + e * x.clone();
    Proof { r, s }
}

/// Verifies `proof` against the statement `capital_x = x*G`.
pub fn verify<P: ECPoint>(proof: &Proof<P>, capital_x: &P) -> Result<()> {
    if proof.r.is_point_at_infinity() {
        return Err(Error::ProofInvalid("Schnorr proof commitment is the identity"));
    }
    if proof.s.is_zero() {
        return Err(Error::ProofInvalid("Schnorr proof response is zero"));
    }
    if capital_x.is_point_at_infinity() {
        return Err(Error::ProofInvalid("Schnorr statement point is the identity"));
    }

    let e = challenge::<P>(&proof.r, capital_x);
    let lhs = P::from_scalar(&proof.s);
    let rhs = proof.r + *capital_x * e;
    if lhs == rhs {
        Ok(())
    } else {
        Err(Error::ProofInvalid("Schnorr verification equation failed"))
    }
}

/// `e = H(G ‖ X ‖ R) mod q`, via a wide hash reduced into the scalar field.
fn challenge<P: ECPoint>(r: &P, capital_x: &P) -> P::Scalar {
    let generator = P::from_scalar(&P::Scalar::from(1));
    let mut hasher = Sha256::new();
    hasher.update(generator.x_bytes());
    hasher.update(generator.y_bytes());
    hasher.update(capital_x.x_bytes());
    hasher.update(capital_x.y_bytes());
    hasher.update(r.x_bytes());
    hasher.update(r.y_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    P::Scalar::from_bytes_mod_order(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::secp256k1::{Point, Scalar};
    use rand::SeedableRng;

    #[test]
    fn honestly_generated_proof_verifies() {
        let mut rng = Rng::from_seed([31; 32]);
        let x = Scalar::random(&mut rng);
        let capital_x = Point::from_scalar(&x);
        let proof = prove::<Point>(&x, &capital_x, &mut rng);
        assert!(verify(&proof, &capital_x).is_ok());
    }

    #[test]
    fn tampered_response_is_rejected() {
        let mut rng = Rng::from_seed([32; 32]);
        let x = Scalar::random(&mut rng);
        let capital_x = Point::from_scalar(&x);
        let mut proof = prove::<Point>(&x, &capital_x, &mut rng);
        proof.s = proof.s + Scalar::from(1);
        assert!(verify(&proof, &capital_x).is_err());
    }

    #[test]
    fn identity_commitment_and_zero_response_is_rejected() {
        let mut rng = Rng::from_seed([33; 32]);
        let x = Scalar::random(&mut rng);
        let capital_x = Point::from_scalar(&x);
        let forged = Proof { r: Point::point_at_infinity(), s: Scalar::zero() };
        assert!(verify(&forged, &capital_x).is_err());
    }
}
