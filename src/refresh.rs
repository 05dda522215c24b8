//! Share refresh: a DKG variant that rotates every party's share while
//! holding the group public key fixed.
//!
//! A fixed "devotee" subset of the pre-refresh parties seed round 1 with
//! their existing share weighted by the Lagrange coefficient that
//! reconstructs the secret from exactly that subset; everyone else
//! (parties rotating in without a prior share, or simply not selected as
//! a devotee this round) seeds with zero. Summed with the other parties'
//! seeds, the result reconstructs the same secret under a freshly chosen
//! random polynomial — hence new shares, same public key.

use crate::crypto::{ECPoint, ECScalar, Rng};
use crate::dkg::core::{RefreshVariant, StateMachine};
use crate::dkg::messages::{KeyArtifact, Round1Message, Round2Message};
use crate::error::Result;
use crate::params::ThresholdParameters;
use crate::polynomial::lagrange_coefficient_for_id;

pub use crate::commitment::Commitment;

/// One party's view of a refresh run.
pub struct Refresh<P: ECPoint>(StateMachine<P, RefreshVariant>);

impl<P: ECPoint> Refresh<P> {
    /// Round 1. `own_share` is this party's pre-refresh share if it is a
    /// devotee this round, `None` otherwise; `devotee_ids` is the full
    /// fixed set of devotee ids, identical across every party running
    /// this refresh. `public_key` is the pre-refresh group public key,
    /// checked for invariance once round 3 completes.
    pub fn begin(
        id: u16,
        params: ThresholdParameters,
        own_share: Option<P::Scalar>,
        devotee_ids: &[u16],
        public_key: P,
        rng: &mut Rng,
    ) -> Result<(Self, Round1Message)> {
        let seed = match own_share {
            Some(share) => {
                let lambda = lagrange_coefficient_for_id::<P::Scalar>(devotee_ids, id)?;
                share * lambda
            }
            None => P::Scalar::zero(),
        };

        let (state, message) =
            StateMachine::begin(id, params, seed, None, Some(public_key), rng)?;
        Ok((Refresh(state), message))
    }

    pub fn step2(
        &mut self,
        peer_commitments: std::collections::BTreeMap<u16, Commitment>,
        rng: &mut Rng,
    ) -> Result<std::collections::BTreeMap<u16, Round2Message<P>>> {
        self.0.step2(peer_commitments, rng)
    }

    pub fn step3(
        &mut self,
        incoming: std::collections::BTreeMap<u16, Round2Message<P>>,
    ) -> Result<KeyArtifact<P>> {
        self.0.step3(incoming)
    }
}
