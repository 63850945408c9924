//! Schnorr-style proof of knowledge of the opening of a dual-group commitment.
//!
//! The statement is over the G1 component of the commitment: the prover knows attributes m_i
//! and a blinding factor r with cmg1 = g1·r + Σ ckg1\[i\]·m_i. The proof is made
//! non-interactive by deriving the challenge from the transcript (see
//! [`ChallengeBuilder`]); verifiers re-derive the challenge and reject on mismatch, so a proof
//! cannot pick its own challenge.

use crate::{
    common::*,
    msm,
    pedersen::{Commitment, CommitmentKey, PublicParameters},
    proofs::{Challenge, ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
};
use arrayvec::ArrayVec;
use ff::Field;
use serde::{Deserialize, Serialize};
use std::iter;

/// Fully constructed proof of knowledge of the opening of a commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningProof<const N: usize> {
    /// The commitment to the randomness used in the proof (the blinding commitment).
    #[serde(with = "SerializeElement")]
    scalar_commitment: G1Projective,
    /// The challenge derived from the transcript.
    #[serde(with = "SerializeElement")]
    challenge: Scalar,
    /// The response scalar for the commitment's blinding factor.
    #[serde(with = "SerializeElement")]
    blinding_response: Scalar,
    /// The response scalars for the attributes.
    ///
    /// Uses Box to avoid stack overflows for proofs on large messages.
    #[serde(with = "SerializeElement")]
    responses: Box<[Scalar; N]>,
}

impl<const N: usize> OpeningProof<N> {
    /// Prove knowledge of the opening of `commitment`, binding the proof to the given context
    /// bytes (e.g. an issuer identity or session nonce).
    pub fn prove(
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        msg: &Message<N>,
        bf: BlindingFactor,
        commitment: &Commitment<N>,
        context: &[u8],
        rng: &mut impl Rng,
    ) -> Self {
        let builder = OpeningProofBuilder::generate_proof_commitments(rng, *msg, bf, pp, key);
        let challenge = ChallengeBuilder::new()
            .with(pp)
            .with(key)
            .with(commitment)
            .with(&builder)
            .with_bytes(context)
            .finish();
        builder.generate_proof_response(challenge)
    }

    /// Verify this proof against a commitment and the context it was bound to.
    ///
    /// Re-derives the challenge from the transcript and checks the response equation. Always
    /// resolves to a boolean, also for malformed or adversarial proofs.
    pub fn verify(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        commitment: &Commitment<N>,
        context: &[u8],
    ) -> bool {
        let expected = ChallengeBuilder::new()
            .with(pp)
            .with(key)
            .with(commitment)
            .with(self)
            .with_bytes(context)
            .finish();
        self.challenge == expected.to_scalar() && self.verify_equation(pp, key, commitment)
    }

    /// Check the response equation Σ ckg1\[i\]·z_i + g1·z_r = scalar_commitment + cmg1·e.
    ///
    /// The caller is responsible for checking that the stored challenge matches the transcript;
    /// [`OpeningProof::verify`] does both.
    pub(crate) fn verify_equation(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        commitment: &Commitment<N>,
    ) -> bool {
        let lhs =
            msm::msm(&key.ckg1_projective(), &*self.responses) + pp.g1() * self.blinding_response;
        let rhs = self.scalar_commitment + commitment.to_g1() * self.challenge;
        lhs == rhs
    }

    /// The challenge this proof was formed against.
    pub fn challenge(&self) -> Scalar {
        self.challenge
    }

    /// The response scalars for the attributes.
    ///
    /// This does not include the response scalar for the blinding factor.
    pub fn responses(&self) -> &[Scalar; N] {
        &self.responses
    }
}

impl<const N: usize> ChallengeInput for OpeningProof<N> {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.scalar_commitment);
    }
}

/// A partially-built [`OpeningProof`].
///
/// Built up to (but not including) the challenge phase of a Schnorr proof. Callers assembling a
/// larger transcript (e.g. a credential presentation with disclosed values) consume the builder
/// into their [`ChallengeBuilder`] and finish the proof with
/// [`OpeningProofBuilder::generate_proof_response`].
#[derive(Debug, Clone)]
pub struct OpeningProofBuilder<const N: usize> {
    /// The attribute vector the proof is about.
    msg: Message<N>,
    /// The blinding factor of the commitment the proof is about.
    bf: BlindingFactor,
    /// Commitment to the commitment scalars.
    scalar_commitment: G1Projective,
    /// The commitment scalar for the blinding factor.
    blinding_commitment_scalar: Scalar,
    /// The commitment scalars for the attributes.
    ///
    /// Uses Box to avoid stack overflows for proofs on large messages.
    commitment_scalars: Box<[Scalar; N]>,
}

impl<const N: usize> OpeningProofBuilder<N> {
    /// Run the commitment phase of the Schnorr proof: sample one commitment scalar per
    /// attribute plus one for the blinding factor, and commit to them with the same linear
    /// structure as [`Message::commit`].
    pub fn generate_proof_commitments(
        rng: &mut impl Rng,
        msg: Message<N>,
        bf: BlindingFactor,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
    ) -> Self {
        let blinding_commitment_scalar = Scalar::random(&mut *rng);
        let commitment_scalars = Box::new(
            iter::repeat_with(|| Scalar::random(&mut *rng))
                .take(N)
                .collect::<ArrayVec<_, N>>()
                .into_inner()
                .expect("length mismatch impossible"),
        );

        let scalar_commitment = pp.g1() * blinding_commitment_scalar
            + msm::msm(&key.ckg1_projective(), &*commitment_scalars);

        Self {
            msg,
            bf,
            scalar_commitment,
            blinding_commitment_scalar,
            commitment_scalars,
        }
    }

    /// Get the commitment scalars corresponding to the attributes. A presentation discloses an
    /// attribute by revealing its value together with its commitment scalar, both bound into
    /// the challenge.
    ///
    /// This does not include the commitment scalar for the blinding factor.
    pub fn commitment_scalars(&self) -> &[Scalar; N] {
        &self.commitment_scalars
    }

    /// Run the response phase of the Schnorr proof to complete the proof.
    pub fn generate_proof_response(self, challenge: Challenge) -> OpeningProof<N> {
        let blinding_response =
            self.blinding_commitment_scalar + challenge.to_scalar() * self.bf.as_scalar();
        let responses = Box::new(
            self.msg
                .iter()
                .zip(self.commitment_scalars.iter())
                .map(|(mi, cs)| cs + challenge.to_scalar() * mi)
                .collect::<ArrayVec<_, N>>()
                .into_inner()
                .expect("length mismatch impossible"),
        );

        OpeningProof {
            scalar_commitment: self.scalar_commitment,
            challenge: challenge.to_scalar(),
            blinding_response,
            responses,
        }
    }
}

impl<const N: usize> ChallengeInput for OpeningProofBuilder<N> {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.scalar_commitment);
    }
}
