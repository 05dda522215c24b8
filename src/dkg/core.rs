//! Shared round mechanics behind both the DKG and refresh state machines.
//! The two protocols differ only in how the round-1 seed is chosen and
//! whether the commitment opening carries a chaincode; everything else —
//! commit/reveal ordering, Feldman verification, Schnorr verification,
//! share accumulation — is identical, so it lives here once, generic over
//! a [`Variant`] marker that fixes the opening layout at compile time.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use tracing::{debug, error, warn};
use typenum::Unsigned;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::commitment::{self, Commitment, Opening};
use crate::crypto::{ECPoint, ECScalar, Rng};
use crate::dkg::messages::{KeyArtifact, Round1Message, Round2Message};
use crate::error::{Error, Result};
use crate::params::ThresholdParameters;
use crate::polynomial::Share;
use crate::schnorr;
use crate::vss;

/// Fixes, at compile time, whether the round-1 commitment opening carries
/// a chaincode scalar (DKG) or not (refresh carries no chaincode in its
/// commitment).
pub trait Variant {
    const INCLUDES_CHAINCODE: bool;
}

pub struct DkgVariant;
impl Variant for DkgVariant {
    const INCLUDES_CHAINCODE: bool = true;
}

pub struct RefreshVariant;
impl Variant for RefreshVariant {
    const INCLUDES_CHAINCODE: bool = false;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
enum Round {
    R1Pending,
    R2Pending,
    Done,
    Aborted,
}

/// Per-party transient state for one DKG or refresh run. Deliberately not
/// `Clone`: a party's secret polynomial exists in exactly one place.
pub struct StateMachine<P: ECPoint, V: Variant> {
    id: u16,
    params: ThresholdParameters,
    round: Round,

    u_i: P::Scalar,
    chaincode_i: Option<P::Scalar>,
    verifiers_i: Vec<P>,
    shares_i: Vec<Share<P::Scalar>>,

    own_opening: Option<Opening>,
    peer_commitments: BTreeMap<u16, Commitment>,

    /// Required post-round-3 public key, for refresh's invariance check:
    /// the reconstructed public key must bit-equal the pre-refresh one.
    /// `None` for plain DKG.
    expected_public_key: Option<P>,

    _variant: PhantomData<V>,
}

impl<P: ECPoint, V: Variant> Zeroize for StateMachine<P, V> {
    fn zeroize(&mut self) {
        self.u_i.zeroize();
        self.chaincode_i.zeroize();
        // Feldman verifiers and the combined opening are public values
        // reconstructible from the wire traffic; only the scalars above
        // are secret.
    }
}

impl<P: ECPoint, V: Variant> Drop for StateMachine<P, V> {
    fn drop(&mut self) {
        self.zeroize();
    }
}
impl<P: ECPoint, V: Variant> ZeroizeOnDrop for StateMachine<P, V> {}

impl<P: ECPoint, V: Variant> StateMachine<P, V> {
    /// Begins round 1: runs Feldman.Evaluate over `seed` and commits to
    /// the resulting verifiers (DKG: plus `chaincode`).
    pub fn begin(
        id: u16,
        params: ThresholdParameters,
        seed: P::Scalar,
        chaincode: Option<P::Scalar>,
        expected_public_key: Option<P>,
        rng: &mut Rng,
    ) -> Result<(Self, Round1Message)> {
        if chaincode.is_some() != V::INCLUDES_CHAINCODE {
            return Err(Error::Config("chaincode presence does not match this DKG variant"));
        }
        if id < 1 || id > params.share_count {
            return Err(Error::Config("participant id out of range"));
        }

        let (verifiers_i, shares_i) =
            vss::evaluate::<P>(seed.clone(), params.threshold, params.share_count, rng)?;

        let message = encode_opening_message(&chaincode, &verifiers_i);
        let (commitment, opening) = commitment::commit(message, rng);

        debug!(party = id, round = %Round::R1Pending, "commitment generated");

        let state = StateMachine {
            id,
            params,
            round: Round::R1Pending,
            u_i: seed,
            chaincode_i: chaincode,
            verifiers_i,
            shares_i,
            own_opening: Some(opening),
            peer_commitments: BTreeMap::new(),
            expected_public_key,
            _variant: PhantomData,
        };
        Ok((state, Round1Message { commitment }))
    }

    /// Round 2: having received every peer's round-1 commitment, proves
    /// knowledge of `u_i` and reveals the opening plus each peer's share.
    pub fn step2(
        &mut self,
        peer_commitments: BTreeMap<u16, Commitment>,
        rng: &mut Rng,
    ) -> Result<BTreeMap<u16, Round2Message<P>>> {
        match self.step2_inner(peer_commitments, rng) {
            Ok(outgoing) => {
                self.round = Round::R2Pending;
                Ok(outgoing)
            }
            Err(e) => {
                warn!(party = self.id, round = %self.round, error = %e, "aborted");
                self.round = Round::Aborted;
                Err(e)
            }
        }
    }

    fn step2_inner(
        &mut self,
        peer_commitments: BTreeMap<u16, Commitment>,
        rng: &mut Rng,
    ) -> Result<BTreeMap<u16, Round2Message<P>>> {
        self.require_round(Round::R1Pending)?;
        self.require_peer_count(&peer_commitments)?;

        self.peer_commitments = peer_commitments;

        let capital_u_i = self.verifiers_i[0];
        let proof = schnorr::prove::<P>(&self.u_i, &capital_u_i, rng);

        let opening = self.own_opening.clone().expect("set during begin()");
        let mut outgoing = BTreeMap::new();
        for peer_id in 1..=self.params.share_count {
            if peer_id == self.id {
                continue;
            }
            let share = self.shares_i[(peer_id - 1) as usize].clone();
            outgoing.insert(
                peer_id,
                Round2Message { opening: opening.clone(), share, proof: proof.clone() },
            );
        }
        Ok(outgoing)
    }

    /// Round 3: verifies every peer's opening, Feldman share and Schnorr
    /// proof, then combines everything into the key artifact.
    pub fn step3(
        &mut self,
        incoming: BTreeMap<u16, Round2Message<P>>,
    ) -> Result<KeyArtifact<P>> {
        match self.step3_inner(incoming) {
            Ok(artifact) => {
                self.round = Round::Done;
                debug!(party = self.id, round = %Round::Done, "finished");
                Ok(artifact)
            }
            Err(e) => {
                warn!(party = self.id, round = %self.round, error = %e, "aborted");
                self.round = Round::Aborted;
                Err(e)
            }
        }
    }

    fn step3_inner(&mut self, incoming: BTreeMap<u16, Round2Message<P>>) -> Result<KeyArtifact<P>> {
        self.require_round(Round::R2Pending)?;
        self.require_peer_count(&incoming)?;

        let mut share_sum = self.shares_i[(self.id - 1) as usize].y.clone();
        let mut chaincode_sum = self.chaincode_i.clone();
        let mut combined_verifiers = self.verifiers_i.clone();

        for (peer_id, commitment) in &self.peer_commitments {
            let message = incoming
                .get(peer_id)
                .ok_or(Error::ProtocolOrder("missing round-2 message from a committed peer"))?;

            commitment::open(commitment, &message.opening)?;

            let (peer_chaincode, peer_verifiers) =
                decode_opening_message::<P, V>(&message.opening, self.params.threshold)?;

            if message.share.id != self.id {
                return Err(Error::Encoding("share addressed to the wrong participant"));
            }
            vss::verify(&message.share, &peer_verifiers, self.params.threshold)?;

            if !peer_verifiers[0].is_point_at_infinity() {
                schnorr::verify(&message.proof, &peer_verifiers[0])?;
            }

            share_sum = share_sum + message.share.y.clone();
            chaincode_sum = match (chaincode_sum, peer_chaincode) {
                (Some(a), Some(b)) => Some(a + b),
                (None, None) => None,
                _ => return Err(Error::Encoding("inconsistent chaincode presence across peers")),
            };
            for (slot, peer_verifier) in combined_verifiers.iter_mut().zip(peer_verifiers.iter()) {
                *slot = *slot + *peer_verifier;
            }
        }

        let public_key = combined_verifiers[0];

        if let Some(expected) = &self.expected_public_key {
            if public_key != *expected {
                error!(party = self.id, "post-refresh public key changed");
                return Err(Error::PublicKeyInconsistent(
                    "refresh changed the group public key",
                ));
            }
        }

        let mut share_pub_key_map = BTreeMap::new();
        for k in 1..=self.params.share_count {
            share_pub_key_map.insert(k, vss::evaluate_commitments(&combined_verifiers, k));
        }

        let expected_self_pub = P::from_scalar(&share_sum);
        if share_pub_key_map.get(&self.id) != Some(&expected_self_pub) {
            return Err(Error::PublicKeyInconsistent(
                "own share is inconsistent with the combined Feldman verifiers",
            ));
        }

        let chaincode = chaincode_sum.map(|c| hex::encode(c.to_be_bytes()));

        Ok(KeyArtifact {
            id: self.id,
            share_i: share_sum,
            public_key,
            chaincode,
            share_pub_key_map,
        })
    }

    fn require_round(&self, expected: Round) -> Result<()> {
        if self.round == Round::Aborted {
            return Err(Error::ProtocolOrder("state machine already aborted"));
        }
        if self.round != expected {
            return Err(Error::ProtocolOrder("step invoked out of order"));
        }
        Ok(())
    }

    fn require_peer_count<T>(&self, peers: &BTreeMap<u16, T>) -> Result<()> {
        if peers.len() as u16 != self.params.share_count - 1 {
            return Err(Error::ProtocolOrder("expected exactly N-1 peer messages"));
        }
        Ok(())
    }
}

fn encode_opening_message<P: ECPoint>(chaincode: &Option<P::Scalar>, verifiers: &[P]) -> Vec<Vec<u8>> {
    let mut message = Vec::with_capacity(1 + verifiers.len() * 2);
    if let Some(c) = chaincode {
        message.push(c.to_be_bytes());
    }
    for verifier in verifiers {
        message.push(verifier.x_bytes().to_vec());
        message.push(verifier.y_bytes().to_vec());
    }
    message
}

fn decode_opening_message<P: ECPoint, V: Variant>(
    opening: &Opening,
    threshold: u16,
) -> Result<(Option<P::Scalar>, Vec<P>)> {
    let mut chunks = opening.message.iter();

    let chaincode = if V::INCLUDES_CHAINCODE {
        let bytes = chunks.next().ok_or(Error::Encoding("opening is missing the chaincode"))?;
        Some(P::Scalar::from_be_bytes_checked(bytes)?)
    } else {
        None
    };

    let mut verifiers = Vec::with_capacity(threshold as usize);
    loop {
        let (x_bytes, y_bytes) = match (chunks.next(), chunks.next()) {
            (Some(x), Some(y)) => (x, y),
            (None, None) => break,
            _ => return Err(Error::Encoding("opening has an odd number of coordinate chunks")),
        };
        verifiers.push(decode_point::<P>(x_bytes, y_bytes)?);
    }

    if verifiers.len() != threshold as usize {
        return Err(Error::Encoding("opening does not carry exactly `threshold` verifiers"));
    }

    Ok((chaincode, verifiers))
}

fn decode_point<P: ECPoint>(x_bytes: &[u8], y_bytes: &[u8]) -> Result<P> {
    if x_bytes.len() > 32 || y_bytes.len() > 32 {
        return Err(Error::Encoding("point coordinate longer than 32 bytes"));
    }
    let mut x = [0u8; 32];
    let mut y = [0u8; 32];
    x[32 - x_bytes.len()..].copy_from_slice(x_bytes);
    y[32 - y_bytes.len()..].copy_from_slice(y_bytes);

    if x == [0u8; 32] && y == [0u8; 32] {
        return Ok(P::point_at_infinity());
    }

    match P::CompressedPointLength::to_usize() {
        // secp256k1's decompress accepts the uncompressed SEC1 form directly.
        33 => {
            let mut uncompressed = [0u8; 65];
            uncompressed[0] = 0x04;
            uncompressed[1..33].copy_from_slice(&x);
            uncompressed[33..65].copy_from_slice(&y);
            P::decompress(&uncompressed)
        }
        // ed25519 points carry y plus a sign bit of x, packed into 32 bytes;
        // reconstruct that form from the coordinates we just decoded.
        32 => decode_edwards_point::<P>(&x, &y),
        _ => Err(Error::Encoding("unsupported point encoding length")),
    }
}

fn decode_edwards_point<P: ECPoint>(x: &[u8; 32], y: &[u8; 32]) -> Result<P> {
    let sign = x[31] & 1;
    let mut encoded = *y;
    encoded.reverse();
    if sign == 1 {
        encoded[31] |= 0x80;
    }
    P::decompress(&encoded)
}
