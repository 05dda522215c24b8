//! Curve abstraction.
//!
//! A uniform interface over the two curve families the protocol runs over:
//! secp256k1 (short Weierstrass) and the Ed25519 curve (twisted Edwards).
//! Polynomial evaluation, Feldman VSS, Schnorr proofs and the DKG/refresh
//! state machines are written once, generic over [`ECPoint`]/[`ECScalar`],
//! and instantiated for each curve family in [`secp256k1`] and [`curve25519`].

pub mod curve25519;
#[macro_use]
mod helpers;
pub mod secp256k1;

use crate::error::{Error, Result};
use generic_array::{typenum::Unsigned, ArrayLength, GenericArray};
use std::fmt::Debug;
use zeroize::{DefaultIsZeroes, Zeroize, ZeroizeOnDrop};

/// The source of randomness required by every sampling operation in the
/// protocol. Must be cryptographically secure.
pub type Rng = rand::rngs::StdRng;

/// A scalar in the prime-order field of some curve's group order `q`.
pub trait ECScalar:
    Clone
    + Debug
    + Default
    + PartialEq
    + Eq
    + Zeroize
    + ZeroizeOnDrop
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
    + for<'a> std::ops::Add<&'a Self, Output = Self>
    + for<'a> std::ops::Sub<&'a Self, Output = Self>
    + for<'a> std::ops::Mul<&'a Self, Output = Self>
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::iter::Sum
    + From<u32>
{
    /// Samples uniformly from `[1, q-1]`.
    fn random(rng: &mut Rng) -> Self;

    /// Reduces an arbitrary 32-byte big-endian string modulo `q`.
    fn from_bytes_mod_order(x: &[u8; 32]) -> Self;

    /// Parses an unpadded big-endian integer, erroring if it is not
    /// strictly smaller than the group order. Scalars serialize as
    /// unpadded big-endian integers on the wire.
    fn from_be_bytes_checked(bytes: &[u8]) -> Result<Self>;

    /// Unpadded big-endian encoding of this scalar.
    fn to_be_bytes(&self) -> Vec<u8>;

    fn zero() -> Self;

    fn is_zero(&self) -> bool {
        self == &Self::zero()
    }

    /// Modular multiplicative inverse, or `None` if `self` is zero.
    fn invert(&self) -> Option<Self>;
}

/// A point on one of the two supported curves.
///
/// The identity element is a distinguished value (`point_at_infinity`);
/// it is a valid [`ECPoint`] but MUST be rejected wherever a proof
/// statement requires a non-trivial public value.
pub trait ECPoint:
    Clone
    + Copy
    + Debug
    + Default
    + DefaultIsZeroes
    + 'static
    + serde::Serialize
    + for<'de> serde::Deserialize<'de>
    + std::ops::Mul<Self::Scalar, Output = Self>
    + for<'a> std::ops::Mul<&'a Self::Scalar, Output = Self>
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::iter::Sum
    + PartialEq
    + Eq
    + Sync
    + Send
{
    type Scalar: ECScalar;

    /// Length in bytes of [`Self::compressed_encode`]'s output.
    type CompressedPointLength: ArrayLength + Unsigned;

    /// `k * G` for the curve's conventional base point `G`.
    fn from_scalar(scalar: &Self::Scalar) -> Self;

    fn point_at_infinity() -> Self;

    fn is_point_at_infinity(&self) -> bool {
        self == &Self::point_at_infinity()
    }

    /// Always true for values of this type: points are constructed either
    /// from a scalar or by decompressing a wire value that is checked at
    /// parse time, so there is no "off curve" representable state. Kept
    /// as an explicit predicate in its own right for call sites that want
    /// to assert curve membership without caring how it was established.
    fn is_on_curve(&self) -> bool {
        true
    }

    /// Canonical compressed encoding (SEC1 for secp256k1, standard
    /// compressed Edwards point for ed25519).
    fn compressed_encode(&self) -> GenericArray<u8, Self::CompressedPointLength>;

    /// Inverse of [`Self::compressed_encode`]. Errors on malformed input
    /// or a byte string that does not decode to a point on the curve.
    fn decompress(bytes: &[u8]) -> Result<Self>;

    /// Big-endian affine X coordinate, used both for the wire `(X, Y)`
    /// point encoding and as the sole HMAC input for BIP32 derivation.
    fn x_bytes(&self) -> [u8; 32];

    /// Big-endian affine Y coordinate.
    fn y_bytes(&self) -> [u8; 32];
}

/// Adds two points. Mixing curve families is prevented by the type system
/// (each family has its own `Point` type), so this is infallible; kept as
/// a free function alongside the `Add` impl for call sites that prefer a
/// named operation over an operator.
pub fn point_add<P: ECPoint>(a: P, b: P) -> P {
    a + b
}

pub(crate) fn encoding_error(msg: &'static str) -> Error {
    Error::Encoding(msg)
}
