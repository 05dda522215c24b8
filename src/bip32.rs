//! Non-hardened BIP32-style derivation over threshold shares, restricted
//! to secp256k1.
//!
//! Deliberately deviates from canonical BIP32: the HMAC message is built
//! from only the parent public key's X coordinate, not its 33-byte
//! compressed encoding. This preserves wire compatibility with existing
//! chaincodes rather than following BIP32 to the letter.

use crate::crypto::secp256k1::{Point, Scalar};
use crate::crypto::{ECPoint, ECScalar};
use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha512;

const HMAC_KEY: &[u8] = b"Key share derivation:\n";

type HmacSha512 = Hmac<Sha512>;

/// The maximum non-hardened child index, exclusive (`2^31`).
pub const NON_HARDENED_LIMIT: u32 = 1 << 31;

/// A 32-byte chaincode.
pub type ChainCode = [u8; 32];

/// The result of deriving one non-hardened child: the child public key,
/// the derivation offset applied (so callers can track a cumulative
/// offset across a chain of derivations), and the new chaincode.
pub struct Derived {
    pub child_public_key: Point,
    pub offset: Scalar,
    pub child_chaincode: ChainCode,
}

/// Derives a non-hardened child at `index` from `(public_key, chaincode)`.
///
/// Returns [`Error::Config`] for a hardened index (`index >= 2^31`).
pub fn derive_public(public_key: &Point, chaincode: &ChainCode, index: u32) -> Result<Derived> {
    if index >= NON_HARDENED_LIMIT {
        return Err(Error::Config("hardened derivation is not supported"));
    }

    let mut mac =
        HmacSha512::new_from_slice(HMAC_KEY).map_err(|_| Error::CryptoRng)?;
    mac.update(chaincode);
    mac.update(&public_key.x_bytes());
    mac.update(&index.to_be_bytes());
    let i = mac.finalize().into_bytes();

    let mut i_l = [0u8; 32];
    i_l.copy_from_slice(&i[..32]);
    let mut child_chaincode = [0u8; 32];
    child_chaincode.copy_from_slice(&i[32..]);

    let offset = Scalar::from_be_bytes_checked(&i_l)
        .map_err(|_| Error::Config("derived offset is out of range"))?;
    if offset.is_zero() {
        return Err(Error::Config("derived offset is zero"));
    }

    let child_public_key = *public_key + Point::from_scalar(&offset);

    Ok(Derived { child_public_key, offset, child_chaincode })
}

/// Derives the corresponding child share, given the parent's own share.
pub fn derive_share(share: &Scalar, offset: &Scalar) -> Scalar {
    share.clone() + offset.clone()
}

/// Running total of derivation offsets applied along a chain, used so a
/// signer can later reconstruct the child private-key relation from the
/// combined parent share.
#[derive(Clone, Default)]
pub struct CumulativeOffset(Scalar);

impl CumulativeOffset {
    pub fn new() -> Self {
        CumulativeOffset(Scalar::zero())
    }

    pub fn accumulate(&mut self, offset: &Scalar) {
        self.0 = self.0.clone() + offset.clone();
    }

    pub fn scalar(&self) -> &Scalar {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Rng;
    use rand::SeedableRng;

    #[test]
    fn child_public_key_matches_offset_relation() {
        let mut rng = Rng::from_seed([51; 32]);
        let x = Scalar::random(&mut rng);
        let capital_x = Point::from_scalar(&x);
        let chaincode = [7u8; 32];

        let mut cumulative = CumulativeOffset::new();
        let mut current_pub = capital_x;
        for _ in 0..3 {
            let derived = derive_public(&current_pub, &chaincode, 0).unwrap();
            cumulative.accumulate(&derived.offset);
            current_pub = derived.child_public_key;
        }

        let expected = capital_x + Point::from_scalar(cumulative.scalar());
        assert_eq!(current_pub, expected);
    }

    #[test]
    fn hardened_index_is_rejected() {
        let chaincode = [0u8; 32];
        let point = Point::from_scalar(&Scalar::from(1));
        assert!(derive_public(&point, &chaincode, NON_HARDENED_LIMIT).is_err());
    }

    #[test]
    fn child_share_tracks_child_public_key() {
        let mut rng = Rng::from_seed([52; 32]);
        let share = Scalar::random(&mut rng);
        let parent_public = Point::from_scalar(&share);
        let chaincode = [3u8; 32];

        let derived = derive_public(&parent_public, &chaincode, 9).unwrap();
        let child_share = derive_share(&share, &derived.offset);

        assert_eq!(Point::from_scalar(&child_share), derived.child_public_key);
    }
}
