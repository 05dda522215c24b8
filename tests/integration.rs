//! End-to-end multi-party scenarios run entirely in-process: every
//! party's state machine lives in this test binary, messages are passed
//! by cloning/copying the wire types between `BTreeMap`s rather than over
//! any real transport.

use rand::SeedableRng;
use std::collections::BTreeMap;
use threshold_keygen::crypto::curve25519::edwards::Point as EdPoint;
use threshold_keygen::crypto::secp256k1::{Point, Scalar};
use threshold_keygen::dkg::messages::KeyArtifact;
use threshold_keygen::dkg::Dkg;
use threshold_keygen::error::Error;
use threshold_keygen::refresh::Refresh;
use threshold_keygen::{bip32, ECPoint, ECScalar, Rng, ThresholdParameters};

fn run_dkg<P: ECPoint>(
    params: ThresholdParameters,
    rng: &mut Rng,
) -> BTreeMap<u16, KeyArtifact<P>> {
    let mut parties = BTreeMap::new();
    let mut round1 = BTreeMap::new();
    for id in 1..=params.share_count {
        let (party, message) = Dkg::<P>::begin(id, params, rng).unwrap();
        parties.insert(id, party);
        round1.insert(id, message.commitment);
    }

    let mut round2 = BTreeMap::new();
    for (&id, party) in parties.iter_mut() {
        let peer_commitments: BTreeMap<u16, _> =
            round1.iter().filter(|(&peer, _)| peer != id).map(|(&p, c)| (p, *c)).collect();
        round2.insert(id, party.step2(peer_commitments, rng).unwrap());
    }

    let mut artifacts = BTreeMap::new();
    for (&id, party) in parties.iter_mut() {
        let incoming: BTreeMap<u16, _> = round2
            .iter()
            .filter(|(&sender, _)| sender != id)
            .map(|(&sender, messages)| (sender, messages[&id].clone()))
            .collect();
        artifacts.insert(id, party.step3(incoming).unwrap());
    }
    artifacts
}

#[test]
fn three_of_three_secp256k1_dkg_reconstructs_via_lagrange() {
    let mut rng = Rng::from_seed([101; 32]);
    let params = ThresholdParameters::new(3, 2).unwrap();
    let artifacts = run_dkg::<Point>(params, &mut rng);

    let public_key = artifacts[&1].public_key;
    let shares: Vec<_> = artifacts
        .values()
        .take(2)
        .map(|a| threshold_keygen::polynomial::Share { id: a.id, y: a.share_i.clone() })
        .collect();
    let secret = threshold_keygen::polynomial::recover_secret(&shares).unwrap();
    assert_eq!(Point::from_scalar(&secret), public_key);

    for artifact in artifacts.values() {
        assert!(artifact.chaincode.is_some());
    }
}

#[test]
fn two_of_three_ed25519_dkg_agrees_on_one_public_key() {
    let mut rng = Rng::from_seed([102; 32]);
    let params = ThresholdParameters::new(3, 2).unwrap();
    let artifacts = run_dkg::<EdPoint>(params, &mut rng);

    let public_key = artifacts[&1].public_key;
    for artifact in artifacts.values() {
        assert_eq!(artifact.public_key, public_key);
        assert_eq!(
            artifact.share_pub_key_map[&artifact.id],
            EdPoint::from_scalar(&artifact.share_i)
        );
    }
}

/// Scenario from the concrete refresh examples: a (2,4) group where only
/// parties 1 and 2 (the devotees) hold a pre-refresh share; parties 3 and
/// 4 are rotating in fresh and start the round with no share at all.
#[test]
fn four_party_refresh_admits_parties_with_no_prior_share() {
    let mut rng = Rng::from_seed([103; 32]);
    let dkg_params = ThresholdParameters::new(2, 2).unwrap();
    let dkg_artifacts = run_dkg::<Point>(dkg_params, &mut rng);
    let public_key = dkg_artifacts[&1].public_key;

    let refresh_params = ThresholdParameters::new(4, 2).unwrap();
    let devotee_ids = vec![1u16, 2u16];

    let mut parties = BTreeMap::new();
    let mut round1 = BTreeMap::new();
    for id in 1..=refresh_params.share_count {
        let own_share = dkg_artifacts.get(&id).map(|a| a.share_i.clone());
        let (party, message) =
            Refresh::<Point>::begin(id, refresh_params, own_share, &devotee_ids, public_key, &mut rng)
                .unwrap();
        parties.insert(id, party);
        round1.insert(id, message.commitment);
    }

    let mut round2 = BTreeMap::new();
    for (&id, party) in parties.iter_mut() {
        let peer_commitments: BTreeMap<u16, _> =
            round1.iter().filter(|(&peer, _)| peer != id).map(|(&p, c)| (p, *c)).collect();
        round2.insert(id, party.step2(peer_commitments, &mut rng).unwrap());
    }

    let mut artifacts = BTreeMap::new();
    for (&id, party) in parties.iter_mut() {
        let incoming: BTreeMap<u16, _> = round2
            .iter()
            .filter(|(&sender, _)| sender != id)
            .map(|(&sender, messages)| (sender, messages[&id].clone()))
            .collect();
        artifacts.insert(id, party.step3(incoming).unwrap());
    }

    for artifact in artifacts.values() {
        assert_eq!(artifact.public_key, public_key);
        assert!(artifact.chaincode.is_none());
    }
}

/// A (2,3) refresh with devotee list [1, 3], run twice in a row: the
/// public key never moves, but each party's share is different after
/// every round.
#[test]
fn repeated_three_party_refresh_rotates_shares_but_not_the_public_key() {
    let mut rng = Rng::from_seed([104; 32]);
    let params = ThresholdParameters::new(3, 2).unwrap();
    let dkg_artifacts = run_dkg::<Point>(params, &mut rng);
    let public_key = dkg_artifacts[&1].public_key;
    let devotee_ids = vec![1u16, 3u16];

    let mut current: BTreeMap<u16, Scalar> =
        dkg_artifacts.iter().map(|(&id, a)| (id, a.share_i.clone())).collect();

    for _ in 0..2 {
        let before = current.clone();

        let mut parties = BTreeMap::new();
        let mut round1 = BTreeMap::new();
        for id in 1..=params.share_count {
            let own_share =
                if devotee_ids.contains(&id) { Some(current[&id].clone()) } else { None };
            let (party, message) = Refresh::<Point>::begin(
                id,
                params,
                own_share,
                &devotee_ids,
                public_key,
                &mut rng,
            )
            .unwrap();
            parties.insert(id, party);
            round1.insert(id, message.commitment);
        }

        let mut round2 = BTreeMap::new();
        for (&id, party) in parties.iter_mut() {
            let peer_commitments: BTreeMap<u16, _> =
                round1.iter().filter(|(&peer, _)| peer != id).map(|(&p, c)| (p, *c)).collect();
            round2.insert(id, party.step2(peer_commitments, &mut rng).unwrap());
        }

        let mut artifacts = BTreeMap::new();
        for (&id, party) in parties.iter_mut() {
            let incoming: BTreeMap<u16, _> = round2
                .iter()
                .filter(|(&sender, _)| sender != id)
                .map(|(&sender, messages)| (sender, messages[&id].clone()))
                .collect();
            artifacts.insert(id, party.step3(incoming).unwrap());
        }

        for artifact in artifacts.values() {
            assert_eq!(artifact.public_key, public_key);
        }
        current = artifacts.into_iter().map(|(id, a)| (id, a.share_i)).collect();
        for (id, share) in &current {
            assert_ne!(*share, before[id]);
        }
    }
}

#[test]
fn three_chained_non_hardened_derivations_track_a_cumulative_offset() {
    let mut rng = Rng::from_seed([105; 32]);
    let params = ThresholdParameters::new(3, 2).unwrap();
    let artifacts = run_dkg::<Point>(params, &mut rng);

    let artifact = &artifacts[&1];
    let chaincode_hex = artifact.chaincode.clone().unwrap();
    let chaincode_bytes = hex::decode(chaincode_hex).unwrap();
    let mut chaincode = [0u8; 32];
    chaincode.copy_from_slice(&chaincode_bytes);

    let mut public = artifact.public_key;
    let mut share = artifact.share_i.clone();
    let mut cc = chaincode;
    let mut cumulative = bip32::CumulativeOffset::new();

    for _ in 0..3 {
        let derived = bip32::derive_public(&public, &cc, 0).unwrap();
        share = bip32::derive_share(&share, &derived.offset);
        cumulative.accumulate(&derived.offset);
        public = derived.child_public_key;
        cc = derived.child_chaincode;
    }

    assert_eq!(Point::from_scalar(&share), public);
    assert_eq!(Point::from_scalar(&artifact.share_i) + Point::from_scalar(cumulative.scalar()), public);
}

#[test]
fn round_three_rejects_a_tampered_share_with_vss_share_invalid() {
    let mut rng = Rng::from_seed([106; 32]);
    let params = ThresholdParameters::new(3, 2).unwrap();

    let mut parties = BTreeMap::new();
    let mut round1 = BTreeMap::new();
    for id in 1..=params.share_count {
        let (party, message) = Dkg::<Point>::begin(id, params, &mut rng).unwrap();
        parties.insert(id, party);
        round1.insert(id, message.commitment);
    }

    let mut round2 = BTreeMap::new();
    for (&id, party) in parties.iter_mut() {
        let peer_commitments: BTreeMap<u16, _> =
            round1.iter().filter(|(&peer, _)| peer != id).map(|(&p, c)| (p, *c)).collect();
        round2.insert(id, party.step2(peer_commitments, &mut rng).unwrap());
    }

    let mut forged = round2[&1][&2].clone();
    forged.share.y = forged.share.y.clone() + Scalar::from(1);
    round2.get_mut(&1).unwrap().insert(2, forged);

    let incoming: BTreeMap<u16, _> = round2
        .iter()
        .filter(|(&sender, _)| sender != 2)
        .map(|(&sender, messages)| (sender, messages[&2].clone()))
        .collect();

    let result = parties.get_mut(&2).unwrap().step3(incoming);
    assert!(matches!(result, Err(Error::VssShareInvalid)));
}
