//! Wire types for the DKG/refresh rounds.

use crate::commitment::{Commitment, Opening};
use crate::crypto::ECPoint;
use crate::polynomial::Share;
use crate::schnorr;
use std::collections::BTreeMap;

/// Round 1: a single hash commitment, broadcast to every peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round1Message {
    pub commitment: Commitment,
}

/// Round 2: the commitment opening, the recipient's share, and a Schnorr
/// proof of knowledge of this party's polynomial secret — one such
/// message per peer, addressed point-to-point (the share differs per
/// recipient; the opening and proof are identical across recipients).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round2Message<P: ECPoint> {
    pub opening: Opening,
    pub share: Share<P::Scalar>,
    pub proof: schnorr::Proof<P>,
}

/// Round 3's output: the durable key artifact, returned to the caller
/// rather than sent over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyArtifact<P: ECPoint> {
    pub id: u16,
    pub share_i: P::Scalar,
    pub public_key: P,
    /// Hex-encoded combined chaincode. Present after DKG; `None` after
    /// refresh, which preserves the caller's existing chaincode instead
    /// of regenerating one.
    pub chaincode: Option<String>,
    pub share_pub_key_map: BTreeMap<u16, P>,
}
