//! Feldman verifiable secret sharing: polynomial commitments as points,
//! and share verification against them.

use crate::crypto::{ECPoint, ECScalar, Rng};
use crate::error::{Error, Result};
use crate::polynomial::{Polynomial, Share};

/// `Evaluate(secret)`: builds the degree-`threshold - 1` polynomial with
/// `a_0 = secret`, returning its Feldman verifiers and the shares for
/// participants `1..=share_count`.
pub fn evaluate<P: ECPoint>(
    secret: P::Scalar,
    threshold: u16,
    share_count: u16,
    rng: &mut Rng,
) -> crate::error::Result<(Vec<P>, Vec<Share<P::Scalar>>)> {
    let poly = Polynomial::init(secret, threshold - 1, rng)?;
    let verifiers = poly.commitments::<P>();
    let shares = poly.evaluate_all(share_count);
    Ok((verifiers, shares))
}

/// `share.y*G == verifiers[0] + Σ_{j>=1} (share.id^j)*verifiers[j]`.
///
/// Errors with [`Error::Config`] if fewer than `threshold` verifiers are
/// supplied, and with [`Error::VssShareInvalid`] if the equation fails.
pub fn verify<P: ECPoint>(share: &Share<P::Scalar>, verifiers: &[P], threshold: u16) -> Result<()> {
    if verifiers.len() < threshold as usize {
        return Err(Error::Config("fewer Feldman verifiers than the threshold requires"));
    }

    let expected = P::from_scalar(&share.y);
    let accumulated = evaluate_commitments(verifiers, share.id);

    if expected == accumulated {
        Ok(())
    } else {
        Err(Error::VssShareInvalid)
    }
}

/// `Σ_j (x^j) * verifiers[j]` — what the Feldman verifiers imply the
/// polynomial's value at `x` times `G` must be, without knowing any
/// coefficient. Also used to derive `share_pub_key_map` entries from the
/// combined verifier vector in the DKG/refresh round-3 step.
pub fn evaluate_commitments<P: ECPoint>(verifiers: &[P], x: u16) -> P {
    let mut accumulated = verifiers[0];
    let mut power = P::Scalar::from(x as u32);
    for verifier in &verifiers[1..] {
        accumulated = accumulated + *verifier * &power;
        power = power * P::Scalar::from(x as u32);
    }
    accumulated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::secp256k1::{Point, Scalar};
    use rand::SeedableRng;

    #[test]
    fn every_generated_share_verifies() {
        let mut rng = Rng::from_seed([41; 32]);
        let secret = Scalar::random(&mut rng);
        let (verifiers, shares) = evaluate::<Point>(secret, 3, 5, &mut rng).unwrap();
        for share in &shares {
            assert!(verify(share, &verifiers, 3).is_ok());
        }
    }

    #[test]
    fn a_flipped_share_fails_verification() {
        let mut rng = Rng::from_seed([42; 32]);
        let secret = Scalar::random(&mut rng);
        let (verifiers, mut shares) = evaluate::<Point>(secret, 2, 3, &mut rng).unwrap();
        shares[0].y = shares[0].y.clone() + Scalar::from(1);
        assert!(verify(&shares[0], &verifiers, 2).is_err());
    }

    #[test]
    fn verification_requires_enough_verifiers() {
        let mut rng = Rng::from_seed([43; 32]);
        let secret = Scalar::random(&mut rng);
        let (verifiers, shares) = evaluate::<Point>(secret, 3, 3, &mut rng).unwrap();
        assert!(verify(&shares[0], &verifiers[..1], 3).is_err());
    }
}
