pub mod edwards;

use super::ECScalar;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

type SK = curve25519_dalek::scalar::Scalar;

/// A scalar in the Ed25519 group's prime-order field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scalar(pub(super) SK);

mod scalar_impls {
    use super::*;
    use zeroize::Zeroize;

    derive_scalar_impls!(Scalar);

    impl ECScalar for Scalar {
        fn random(rng: &mut crate::crypto::Rng) -> Self {
            use rand::RngCore;

            // `Scalar::random` reduces a wide (64-byte) sample, which is the
            // standard way to sample (close to) uniformly in the group
            // without introducing bias from a 32-byte reduction.
            let mut scalar_bytes = [0u8; 64];
            rng.fill_bytes(&mut scalar_bytes);
            Scalar(SK::from_bytes_mod_order_wide(&scalar_bytes))
        }

        fn from_bytes_mod_order(x: &[u8; 32]) -> Self {
            let mut le = *x;
            le.reverse();
            Scalar(SK::from_bytes_mod_order(le))
        }

        fn from_be_bytes_checked(bytes: &[u8]) -> Result<Self> {
            if bytes.len() > 32 {
                return Err(Error::Encoding("scalar has more than 32 bytes"));
            }
            let mut le = [0u8; 32];
            for (i, b) in bytes.iter().rev().enumerate() {
                le[i] = *b;
            }
            SK::from_canonical_bytes(le)
                .map(Scalar)
                .ok_or(Error::Encoding("scalar not reduced modulo the curve order"))
        }

        fn to_be_bytes(&self) -> Vec<u8> {
            let mut be = self.0.to_bytes();
            be.reverse();
            let first_nonzero = be.iter().position(|b| *b != 0);
            match first_nonzero {
                Some(idx) => be[idx..].to_vec(),
                None => vec![0],
            }
        }

        fn zero() -> Self {
            Scalar(SK::zero())
        }

        fn invert(&self) -> Option<Self> {
            if self.0 != SK::zero() {
                Some(Scalar(self.0.invert()))
            } else {
                None
            }
        }
    }

    impl Zeroize for Scalar {
        fn zeroize(&mut self) {
            self.0.zeroize();
        }
    }

    impl From<u32> for Scalar {
        fn from(x: u32) -> Self {
            Scalar(SK::from(x))
        }
    }

    impl std::ops::Add for &Scalar {
        type Output = Scalar;
        fn add(self, rhs: Self) -> Self::Output {
            Scalar(self.0 + rhs.0)
        }
    }

    impl std::ops::Sub for &Scalar {
        type Output = Scalar;
        fn sub(self, rhs: Self) -> Self::Output {
            Scalar(self.0 - rhs.0)
        }
    }

    impl std::ops::Mul for &Scalar {
        type Output = Scalar;
        fn mul(self, rhs: Self) -> Self::Output {
            Scalar(self.0 * rhs.0)
        }
    }
}
