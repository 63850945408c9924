//! Pedersen commitments \[1\] to attribute vectors, instantiated simultaneously over both
//! prime-order pairing groups from BLS12-381 \[2\].
//!
//! A commitment to an attribute vector is the pair (cmg1, cmg2) formed with the same attribute
//! and blinding scalars against matched bases in G1 and G2. The matched bases are a
//! [`CommitmentKey`]; the shared generators are [`PublicParameters`]. Because the bases are
//! matched, every honestly formed commitment satisfies the pairing equation
//! e(cmg1, g2) = e(g1, cmg2), which verifiers check with [`Commitment::consistency_check`]
//! before trusting a commitment received from an untrusted party.
//!
//! ```
//! # use anoncred_crypto::{BlindingFactor, Message, pedersen::{CommitmentKey, PublicParameters}};
//! # let mut rng = rand::thread_rng();
//! let pp = PublicParameters::<5>::new(&mut rng);
//! let key = CommitmentKey::new(&pp, &mut rng).unwrap();
//! let msg = Message::<5>::random(&mut rng);
//! let bf = BlindingFactor::new(&mut rng);
//! let commitment = msg.commit(&pp, &key, bf);
//! assert!(commitment.consistency_check(&pp));
//! ```
//!
//! ## References
//!
//! 1. Torben Pyrds Pedersen. "Non-interactive and information-theoretic secure verifiable secret
//!    sharing". 1992. URL: <https://www.cs.cornell.edu/courses/cs754/2001fa/129.PDF>
//!
//! 2. D. Boneh, S. Gorbunov, R. Wahby, H. Wee, and Z. Zhang. "BLS Signatures, Version 4".
//!    Internet-draft, IETF. 2021. URL:
//!    <https://datatracker.ietf.org/doc/html/draft-irtf-cfrg-bls-signature-04>

use crate::{
    common::*,
    msm,
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
    Error,
};
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::iter;

/// Shared group generators fixed at setup time for credentials with `N` attributes.
///
/// All parties (holders, issuers, verifiers) operate against the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParameters<const N: usize> {
    #[serde(with = "SerializeElement")]
    g1: G1Affine,
    #[serde(with = "SerializeElement")]
    g2: G2Affine,
}

impl<const N: usize> PublicParameters<N> {
    /// Generate new public parameters with generators chosen uniformly at random from G1* and
    /// G2*.
    pub fn new(rng: &mut impl Rng) -> Self {
        let g1: G1Projective = random_non_identity(&mut *rng);
        let g2: G2Projective = random_non_identity(&mut *rng);
        Self {
            g1: g1.into(),
            g2: g2.into(),
        }
    }

    /// The G1 generator.
    pub fn g1(&self) -> &G1Affine {
        &self.g1
    }

    /// The G2 generator.
    pub fn g2(&self) -> &G2Affine {
        &self.g2
    }
}

impl<const N: usize> ChallengeInput for PublicParameters<N> {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.g1.to_bytes());
        builder.consume_bytes(self.g2.to_bytes());
    }
}

/// Matched commitment bases in G1 and G2.
///
/// The bases are derived from the public parameters by a shared sequence of secret scalars
/// which exist only inside [`CommitmentKey::new`] and are dropped when it returns; holding the
/// key reveals nothing about them. Uses Box to avoid stack overflows with large keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentKey<const N: usize> {
    #[serde(with = "SerializeElement")]
    ckg1: Box<[G1Affine; N]>,
    #[serde(with = "SerializeElement")]
    ckg2: Box<[G2Affine; N]>,
}

impl<const N: usize> CommitmentKey<N> {
    /// Generate a new commitment key against the given public parameters.
    ///
    /// The derivation scalars are chosen uniformly at random and are nonzero. The freshly built
    /// key is checked against its defining pairing equation before it is returned; an
    /// inconsistent key means the group-arithmetic backend is broken, and the error is not
    /// recoverable.
    pub fn new(pp: &PublicParameters<N>, rng: &mut impl Rng) -> Result<Self, Error> {
        let ys = iter::repeat_with(|| random_nonzero(&mut *rng))
            .take(N)
            .collect::<ArrayVec<_, N>>();

        let ckg1 = ys
            .iter()
            .map(|y| (pp.g1 * y).into())
            .collect::<ArrayVec<_, N>>()
            .into_inner()
            .expect("length mismatch impossible");
        let ckg2 = ys
            .iter()
            .map(|y| (pp.g2 * y).into())
            .collect::<ArrayVec<_, N>>()
            .into_inner()
            .expect("length mismatch impossible");

        let key = Self {
            ckg1: Box::new(ckg1),
            ckg2: Box::new(ckg2),
        };
        key.consistency_check(pp)?;
        Ok(key)
    }

    /// Check that the G1 and G2 bases are derived from the same scalars: for every index i,
    /// e(ckg1\[i\], g2) must equal e(g1, ckg2\[i\]).
    ///
    /// This holds by construction for keys built with [`CommitmentKey::new`]; call it on keys
    /// received from a setup party before trusting them.
    pub fn consistency_check(&self, pp: &PublicParameters<N>) -> Result<(), Error> {
        for i in 0..N {
            if pairing(&self.ckg1[i], &pp.g2) != pairing(&pp.g1, &self.ckg2[i]) {
                return Err(Error::InconsistentCommitmentKey(i));
            }
        }
        Ok(())
    }

    /// The G1 bases.
    pub fn ckg1(&self) -> &[G1Affine; N] {
        &self.ckg1
    }

    /// The G2 bases.
    pub fn ckg2(&self) -> &[G2Affine; N] {
        &self.ckg2
    }

    /// The G1 bases as projective points, for use in multi-scalar multiplications.
    pub(crate) fn ckg1_projective(&self) -> ArrayVec<G1Projective, N> {
        self.ckg1.iter().map(G1Projective::from).collect()
    }

    pub(crate) fn ckg2_projective(&self) -> ArrayVec<G2Projective, N> {
        self.ckg2.iter().map(G2Projective::from).collect()
    }
}

impl<const N: usize> ChallengeInput for CommitmentKey<N> {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        for g in &*self.ckg1 {
            builder.consume_bytes(g.to_bytes());
        }
        for g in &*self.ckg2 {
            builder.consume_bytes(g.to_bytes());
        }
    }
}

/// A dual-group Pedersen commitment to an attribute vector.
///
/// This is the public, transmittable part of a commitment; the attribute vector and blinding
/// factor stay with the holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment<const N: usize> {
    #[serde(with = "SerializeElement")]
    cmg1: G1Projective,
    #[serde(with = "SerializeElement")]
    cmg2: G2Projective,
}

impl<const N: usize> Message<N> {
    /// Commit to this attribute vector in both groups using the given blinding factor.
    ///
    /// The inputs are not validated; a commitment built from untrusted values must be checked
    /// with [`Commitment::consistency_check`] by whoever receives it.
    pub fn commit(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        bf: BlindingFactor,
    ) -> Commitment<N> {
        let cmg1 = pp.g1 * bf.as_scalar() + msm::msm(&key.ckg1_projective(), &**self);
        let cmg2 = pp.g2 * bf.as_scalar() + msm::msm(&key.ckg2_projective(), &**self);
        Commitment { cmg1, cmg2 }
    }
}

impl<const N: usize> Commitment<N> {
    /// Verify a provided opening of the commitment.
    pub fn verify_opening(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        bf: BlindingFactor,
        msg: &Message<N>,
    ) -> bool {
        msg.commit(pp, key, bf) == *self
    }

    /// Produce a new commitment to the same attribute vector under blinding factor r + delta.
    ///
    /// This is an incremental update (one scalar multiplication and one addition per group); it
    /// does not repeat the full multi-exponentiation and leaves `self` untouched. The result is
    /// unlinkable to `self` for anyone who sees only the group elements.
    pub fn rerandomize(&self, pp: &PublicParameters<N>, delta: BlindingFactor) -> Commitment<N> {
        Commitment {
            cmg1: self.cmg1 + pp.g1 * delta.as_scalar(),
            cmg2: self.cmg2 + pp.g2 * delta.as_scalar(),
        }
    }

    /// Assemble a commitment from raw group elements, for adversarial tests.
    #[cfg(test)]
    pub(crate) fn from_parts(cmg1: G1Projective, cmg2: G2Projective) -> Self {
        Commitment { cmg1, cmg2 }
    }

    /// Check the dual-group binding equation e(cmg1, g2) = e(g1, cmg2).
    ///
    /// Holds for every commitment built by [`Message::commit`]; commitments received from an
    /// untrusted party must pass this check before they are used.
    pub fn consistency_check(&self, pp: &PublicParameters<N>) -> bool {
        pairing(&self.cmg1.to_affine(), &pp.g2) == pairing(&pp.g1, &self.cmg2.to_affine())
    }

    /// The G1 component of the commitment.
    pub fn to_g1(self) -> G1Projective {
        self.cmg1
    }

    /// The G2 component of the commitment.
    pub fn to_g2(self) -> G2Projective {
        self.cmg2
    }
}

impl<const N: usize> ChallengeInput for Commitment<N> {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.cmg1.to_bytes());
        builder.consume_bytes(self.cmg2.to_bytes());
    }
}
