//! Distributed key generation and share refresh for threshold ECDSA/EdDSA.
//!
//! The crate is organised the way the protocol itself is layered: a
//! generic curve abstraction ([`crypto`]) underlies the cryptographic
//! primitives (Shamir polynomials and Feldman VSS in [`polynomial`] and
//! [`vss`], hash commitments in [`commitment`], Schnorr proofs of
//! knowledge in [`schnorr`]), which the [`dkg`] and [`refresh`] state
//! machines compose into the full three-round protocol. [`bip32`]
//! derives child shares from a finished key, and [`paillier`] provides
//! the additively homomorphic cryptosystem and its companion
//! zero-knowledge proof used by threshold-ECDSA signing alongside this
//! key material.

pub mod bip32;
pub mod commitment;
pub mod crypto;
pub mod dkg;
pub mod error;
pub mod paillier;
pub mod params;
pub mod polynomial;
pub mod refresh;
pub mod schnorr;
pub mod vss;

pub use crypto::{ECPoint, ECScalar, Rng};
pub use dkg::{Dkg, KeyArtifact};
pub use error::{Error, Result};
pub use params::ThresholdParameters;
pub use refresh::Refresh;
