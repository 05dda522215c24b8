//! Distributed key generation: every party samples a fresh random
//! polynomial secret and a fresh random chaincode contribution, then
//! runs the shared round mechanics in [`core`].

pub mod core;
pub mod messages;

use crate::crypto::{ECPoint, ECScalar, Rng};
use crate::error::Result;
use crate::params::ThresholdParameters;
use core::{DkgVariant, StateMachine};

pub use messages::{KeyArtifact, Round1Message, Round2Message};

/// One party's view of a DKG run, from round 1 through the key artifact.
pub struct Dkg<P: ECPoint>(StateMachine<P, DkgVariant>);

impl<P: ECPoint> Dkg<P> {
    /// Round 1: samples this party's polynomial secret and chaincode
    /// contribution uniformly at random and commits to the resulting
    /// Feldman verifiers plus the chaincode.
    pub fn begin(
        id: u16,
        params: ThresholdParameters,
        rng: &mut Rng,
    ) -> Result<(Self, Round1Message)> {
        let seed = P::Scalar::random(rng);
        let chaincode = P::Scalar::random(rng);
        let (state, message) = StateMachine::begin(id, params, seed, Some(chaincode), None, rng)?;
        Ok((Dkg(state), message))
    }

    /// Round 2: reveals this party's opening, per-peer shares and a
    /// Schnorr proof of knowledge of its polynomial secret.
    pub fn step2(
        &mut self,
        peer_commitments: std::collections::BTreeMap<u16, crate::commitment::Commitment>,
        rng: &mut Rng,
    ) -> Result<std::collections::BTreeMap<u16, Round2Message<P>>> {
        self.0.step2(peer_commitments, rng)
    }

    /// Round 3: verifies every peer's contribution and returns the
    /// combined key artifact.
    pub fn step3(
        &mut self,
        incoming: std::collections::BTreeMap<u16, Round2Message<P>>,
    ) -> Result<KeyArtifact<P>> {
        self.0.step3(incoming)
    }
}
