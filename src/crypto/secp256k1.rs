//! secp256k1 instantiation of the curve abstraction (short Weierstrass,
//! `p = 2^256 - 2^32 - 977`).

use super::{ECPoint, ECScalar, Rng};
use crate::error::{Error, Result};
use k256::{
    elliptic_curve::{
        ops::Reduce,
        sec1::{FromEncodedPoint, ToEncodedPoint},
        Field, PrimeField,
    },
    AffinePoint, EncodedPoint, ProjectivePoint,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar(k256::Scalar);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point(ProjectivePoint);

mod scalar_impls {
    use super::*;

    derive_scalar_impls!(Scalar);

    impl ECScalar for Scalar {
        fn random(rng: &mut Rng) -> Self {
            loop {
                let candidate = k256::Scalar::random(&mut *rng);
                if !bool::from(candidate.is_zero()) {
                    return Scalar(candidate);
                }
            }
        }

        fn from_bytes_mod_order(x: &[u8; 32]) -> Self {
            Scalar(k256::Scalar::reduce_bytes(&(*x).into()))
        }

        fn from_be_bytes_checked(bytes: &[u8]) -> Result<Self> {
            if bytes.len() > 32 {
                return Err(Error::Encoding("scalar has more than 32 bytes"));
            }
            let mut buf = [0u8; 32];
            buf[32 - bytes.len()..].copy_from_slice(bytes);
            Option::from(k256::Scalar::from_repr(buf.into()))
                .map(Scalar)
                .ok_or(Error::Encoding("scalar not reduced modulo the curve order"))
        }

        fn to_be_bytes(&self) -> Vec<u8> {
            let bytes = self.0.to_repr();
            let first_nonzero = bytes.iter().position(|b| *b != 0);
            match first_nonzero {
                Some(idx) => bytes[idx..].to_vec(),
                None => vec![0],
            }
        }

        fn zero() -> Self {
            Scalar(k256::Scalar::ZERO)
        }

        fn invert(&self) -> Option<Self> {
            Option::from(self.0.invert()).map(Scalar)
        }
    }

    impl zeroize::Zeroize for Scalar {
        fn zeroize(&mut self) {
            self.0 = k256::Scalar::ZERO;
        }
    }

    impl From<u32> for Scalar {
        fn from(x: u32) -> Self {
            Scalar(k256::Scalar::from(x))
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

    impl Serialize for Scalar {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.to_be_bytes_padded().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Scalar {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let bytes: [u8; 32] = Deserialize::deserialize(deserializer)?;
            Scalar::from_be_bytes_checked(&bytes).map_err(serde::de::Error::custom)
        }
    }

    impl Scalar {
        fn to_be_bytes_padded(&self) -> [u8; 32] {
            self.0.to_repr().into()
        }
    }
}

mod point_impls {
    use super::*;

    derive_point_impls!(Point);

    impl ECPoint for Point {
        type Scalar = Scalar;
        type CompressedPointLength = typenum::U33;

        fn from_scalar(scalar: &Self::Scalar) -> Self {
            Point(ProjectivePoint::GENERATOR * scalar.0)
        }

        fn point_at_infinity() -> Self {
            Point(ProjectivePoint::IDENTITY)
        }

        fn compressed_encode(&self) -> generic_array::GenericArray<u8, Self::CompressedPointLength> {
            let encoded = self.0.to_affine().to_encoded_point(true);
            let mut out = [0u8; 33];
            out[..encoded.len()].copy_from_slice(encoded.as_bytes());
            out.into()
        }

        fn decompress(bytes: &[u8]) -> Result<Self> {
            let encoded = EncodedPoint::from_bytes(bytes)
                .map_err(|_| Error::Encoding("malformed secp256k1 point encoding"))?;
            let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
                .ok_or(Error::Encoding("point is not on the secp256k1 curve"))?;
            Ok(Point(ProjectivePoint::from(affine)))
        }

        fn x_bytes(&self) -> [u8; 32] {
            let encoded = self.0.to_affine().to_encoded_point(false);
            let mut out = [0u8; 32];
            if let Some(x) = encoded.x() {
                out.copy_from_slice(x.as_slice());
            }
            out
        }

        fn y_bytes(&self) -> [u8; 32] {
            let encoded = self.0.to_affine().to_encoded_point(false);
            let mut out = [0u8; 32];
            if let Some(y) = encoded.y() {
                out.copy_from_slice(y.as_slice());
            }
            out
        }
    }

    impl std::ops::Add for Point {
        type Output = Self;
        fn add(self, rhs: Self) -> Self::Output {
            Point(self.0 + rhs.0)
        }
    }

    impl std::ops::Sub for Point {
        type Output = Self;
        fn sub(self, rhs: Self) -> Self::Output {
            Point(self.0 - rhs.0)
        }
    }

    impl<B: std::borrow::Borrow<Scalar>> std::ops::Mul<B> for Point {
        type Output = Self;
        fn mul(self, rhs: B) -> Self::Output {
            Point(self.0 * rhs.borrow().0)
        }
    }

    impl Serialize for Point {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            (self.x_bytes(), self.y_bytes()).serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Point {
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let (x, y): ([u8; 32], [u8; 32]) = Deserialize::deserialize(deserializer)?;
            let mut uncompressed = [0u8; 65];
            uncompressed[0] = 0x04;
            uncompressed[1..33].copy_from_slice(&x);
            uncompressed[33..65].copy_from_slice(&y);
            Point::decompress(&uncompressed).map_err(serde::de::Error::custom)
        }
    }

    #[cfg(test)]
    impl Point {
        pub fn random(rng: &mut Rng) -> Self {
            Point::from_scalar(&Scalar::random(rng))
        }
    }
}
