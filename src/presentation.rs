//! Credential presentations: unlinkable Show and single, multi-issuer, and batched Verify.
//!
//! A [`Presentation`] is what a holder hands a verifier: a freshly rerandomized commitment and
//! signature, a proof of knowledge of the commitment opening, and any selectively disclosed
//! attributes. Rerandomization makes two presentations of the same credential unlinkable; the
//! proof and the signing equations tie the presentation to some credential issued under the
//! named verification key without revealing which one.
//!
//! Verification of a batch of presentations shares the expensive final exponentiation across
//! all pairing checks: each credential's two pairing equations are scaled by independent
//! uniformly random nonzero scalars and their Miller-loop terms accumulated into a single
//! product (see [`crate::pairing_check`]). The per-equation scalars are what keeps the
//! aggregation sound; without them, a forged signature in one equation could cancel against a
//! complementary forgery in another. Terms involving the shared generators (and, for a single
//! issuer, the shared verification key) are aggregated on the opposite side before the Miller
//! loop, so k credentials cost k + O(1) Miller loops and exactly one final exponentiation.

use crate::{
    common::*,
    credential::Credential,
    pairing_check::PairingCheck,
    pedersen::{Commitment, CommitmentKey, PublicParameters},
    pointcheval_sanders::{Signature, VerificationKey},
    proofs::{Challenge, ChallengeBuilder, ChallengeInput, OpeningProof, OpeningProofBuilder},
    serde::SerializeElement,
    Error,
};
use serde::{Deserialize, Serialize};

/// A disclosed attribute: its position, its value, and the commitment scalar the proof used for
/// it.
///
/// All three are bound into the challenge, which is what lets the verifier check the response
/// equation z_i = e·m_i + t_i against the disclosed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disclosure {
    index: usize,
    #[serde(with = "SerializeElement")]
    value: Scalar,
    #[serde(with = "SerializeElement")]
    commitment_scalar: Scalar,
}

impl Disclosure {
    /// The position of the disclosed attribute in the credential's attribute vector.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The disclosed attribute value.
    pub fn value(&self) -> Scalar {
        self.value
    }
}

impl ChallengeInput for Disclosure {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes((self.index as u64).to_le_bytes());
        builder.consume(&self.value);
        builder.consume(&self.commitment_scalar);
    }
}

/// A verifiable, unlinkable presentation of a credential, with zero or more attributes
/// disclosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation<const N: usize> {
    commitment: Commitment<N>,
    signature: Signature,
    proof: OpeningProof<N>,
    disclosures: Vec<Disclosure>,
}

/// Build the presentation transcript. Prover and verifier must consume exactly the same data in
/// exactly the same order; `proof` is the proof builder on the proving side and the finished
/// proof on the verifying side (both contribute the blinding commitment).
fn presentation_challenge<const N: usize>(
    pp: &PublicParameters<N>,
    key: &CommitmentKey<N>,
    vk: &VerificationKey,
    commitment: &Commitment<N>,
    signature: &Signature,
    proof: &impl ChallengeInput,
    disclosures: &[Disclosure],
    context: &[u8],
) -> Challenge {
    let mut builder = ChallengeBuilder::new()
        .with(pp)
        .with(key)
        .with(vk)
        .with(commitment)
        .with(signature)
        .with(proof);
    for disclosure in disclosures {
        builder.consume(disclosure);
    }
    builder.with_bytes(context).finish()
}

impl<const N: usize> Credential<N> {
    /// Show this credential: rerandomize it, prove knowledge of the commitment opening, and
    /// disclose the attributes at the given indices.
    ///
    /// The presentation is bound to the verifier-supplied context (e.g. a session nonce), which
    /// the verifier must pass to [`Presentation::verify`]. Requesting an index outside the
    /// attribute vector fails before any group arithmetic runs.
    pub fn present(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        disclose: &[usize],
        context: &[u8],
        rng: &mut impl Rng,
    ) -> Result<Presentation<N>, Error> {
        for &index in disclose {
            if index >= N {
                return Err(Error::DisclosureOutOfRange { index, length: N });
            }
        }

        let fresh = self.rerandomize(pp, rng);
        let builder = OpeningProofBuilder::generate_proof_commitments(
            rng,
            *fresh.message(),
            fresh.blinding_factor(),
            pp,
            key,
        );

        let disclosures = disclose
            .iter()
            .map(|&index| Disclosure {
                index,
                value: fresh.message()[index],
                commitment_scalar: builder.commitment_scalars()[index],
            })
            .collect::<Vec<_>>();

        let challenge = presentation_challenge(
            pp,
            key,
            self.verification_key(),
            fresh.commitment(),
            fresh.signature(),
            &builder,
            &disclosures,
            context,
        );

        Ok(Presentation {
            commitment: *fresh.commitment(),
            signature: *fresh.signature(),
            proof: builder.generate_proof_response(challenge),
            disclosures,
        })
    }
}

impl<const N: usize> Presentation<N> {
    /// Verify this presentation against an issuer's key and the context it was bound to.
    ///
    /// Checks, in order: the signature is well-formed, the challenge matches the transcript,
    /// the Schnorr response equation holds, every disclosed value matches its response scalar,
    /// and the signing and commitment-consistency pairing equations hold. Always resolves to a
    /// boolean.
    pub fn verify(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        vk: &VerificationKey,
        context: &[u8],
    ) -> bool {
        self.verify_proof_parts(pp, key, vk, context)
            && vk.verify(pp, &self.commitment, &self.signature)
    }

    /// All the non-pairing checks: transcript, Schnorr equation, disclosures. Batch
    /// verification runs these per presentation and aggregates the pairing work.
    fn verify_proof_parts(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        vk: &VerificationKey,
        context: &[u8],
    ) -> bool {
        if !self.signature.is_well_formed() {
            return false;
        }

        let expected = presentation_challenge(
            pp,
            key,
            vk,
            &self.commitment,
            &self.signature,
            &self.proof,
            &self.disclosures,
            context,
        );
        if self.proof.challenge() != expected.to_scalar() {
            return false;
        }

        if !self.proof.verify_equation(pp, key, &self.commitment) {
            return false;
        }

        self.disclosures.iter().all(|disclosure| {
            disclosure.index < N
                && self.proof.responses()[disclosure.index]
                    == self.proof.challenge() * disclosure.value + disclosure.commitment_scalar
        })
    }

    /// The disclosed attributes carried by this presentation.
    pub fn disclosures(&self) -> &[Disclosure] {
        &self.disclosures
    }
}

/// Aggregated signing and consistency equations for credentials under a single issuer key.
///
/// Terms paired with the shared g2, the shared x2, and the shared g1 are summed on the opposite
/// side first; only the sigma1/cmg2 terms stay per-credential. Each credential's two equations
/// carry independent random scalars.
fn batch_single_issuer<'a, const N: usize>(
    pp: &PublicParameters<N>,
    vk: &VerificationKey,
    items: impl Iterator<Item = (&'a Commitment<N>, &'a Signature)>,
    rng: &mut impl Rng,
) -> bool {
    let mut check = PairingCheck::new();
    // Σ (ρ·sigma2 + ρ'·cmg1), paired with g2.
    let mut g2_side = G1Projective::identity();
    // Σ -ρ·sigma1, paired with x2.
    let mut x2_side = G1Projective::identity();
    // Σ ρ'·cmg2, paired with -g1.
    let mut g1_side = G2Projective::identity();

    for (commitment, signature) in items {
        if !signature.is_well_formed() {
            return false;
        }
        let rho = random_nonzero(&mut *rng);
        let rho_cm = random_nonzero(&mut *rng);

        let sigma1 = signature.sigma1() * rho;
        g2_side += signature.sigma2() * rho + commitment.to_g1() * rho_cm;
        x2_side -= sigma1;
        g1_side += commitment.to_g2() * rho_cm;
        check.push(-sigma1, commitment.to_g2());
    }

    check.push(g2_side, (*pp.g2()).into());
    check.push(x2_side, vk.x2.into());
    check.push(-G1Projective::from(pp.g1()), g1_side);
    check.verify()
}

/// Aggregated signing and consistency equations for credentials under distinct issuer keys.
///
/// Only the shared-generator terms aggregate across issuers; the verification key terms fold
/// into the per-credential G2 points.
fn batch_multi_issuer<'a, const N: usize>(
    pp: &PublicParameters<N>,
    items: impl Iterator<Item = (&'a VerificationKey, &'a Commitment<N>, &'a Signature)>,
    rng: &mut impl Rng,
) -> bool {
    let mut check = PairingCheck::new();
    let mut g2_side = G1Projective::identity();
    let mut g1_side = G2Projective::identity();

    for (vk, commitment, signature) in items {
        if !signature.is_well_formed() {
            return false;
        }
        let rho = random_nonzero(&mut *rng);
        let rho_cm = random_nonzero(&mut *rng);

        g2_side += signature.sigma2() * rho + commitment.to_g1() * rho_cm;
        g1_side += commitment.to_g2() * rho_cm;
        check.push(-(signature.sigma1() * rho), vk.x2 + commitment.to_g2());
    }

    check.push(g2_side, (*pp.g2()).into());
    check.push(-G1Projective::from(pp.g1()), g1_side);
    check.verify()
}

/// Verify signatures over k commitments issued under one shared key, with one final
/// exponentiation for the whole batch.
///
/// Returns true iff every pair would pass [`VerificationKey::verify`] on its own (up to the
/// negligible failure probability of the randomized aggregation). Fails with
/// [`Error::EmptyBatch`] on an empty batch, before any group arithmetic runs.
pub fn verify_signatures_batch<const N: usize>(
    pp: &PublicParameters<N>,
    vk: &VerificationKey,
    credentials: &[(Commitment<N>, Signature)],
    rng: &mut impl Rng,
) -> Result<bool, Error> {
    if credentials.is_empty() {
        return Err(Error::EmptyBatch);
    }
    Ok(batch_single_issuer(
        pp,
        vk,
        credentials.iter().map(|(c, s)| (c, s)),
        rng,
    ))
}

/// Verify signatures over k commitments issued under (potentially) distinct keys, with one
/// final exponentiation for the whole batch.
pub fn verify_signatures_multi_issuer<const N: usize>(
    pp: &PublicParameters<N>,
    credentials: &[(&VerificationKey, Commitment<N>, Signature)],
    rng: &mut impl Rng,
) -> Result<bool, Error> {
    if credentials.is_empty() {
        return Err(Error::EmptyBatch);
    }
    Ok(batch_multi_issuer(
        pp,
        credentials.iter().map(|(vk, c, s)| (*vk, c, s)),
        rng,
    ))
}

/// Verify k presentations issued under one shared key: per-presentation proof and disclosure
/// checks, then a single aggregated pairing check.
pub fn verify_presentations_batch<const N: usize>(
    pp: &PublicParameters<N>,
    key: &CommitmentKey<N>,
    vk: &VerificationKey,
    presentations: &[Presentation<N>],
    context: &[u8],
    rng: &mut impl Rng,
) -> Result<bool, Error> {
    if presentations.is_empty() {
        return Err(Error::EmptyBatch);
    }
    for presentation in presentations {
        if !presentation.verify_proof_parts(pp, key, vk, context) {
            return Ok(false);
        }
    }
    Ok(batch_single_issuer(
        pp,
        vk,
        presentations.iter().map(|p| (&p.commitment, &p.signature)),
        rng,
    ))
}

/// Verify k presentations from (potentially) distinct issuers: per-presentation proof and
/// disclosure checks, then a single aggregated pairing check.
pub fn verify_presentations_multi_issuer<const N: usize>(
    pp: &PublicParameters<N>,
    key: &CommitmentKey<N>,
    presentations: &[(&VerificationKey, Presentation<N>)],
    context: &[u8],
    rng: &mut impl Rng,
) -> Result<bool, Error> {
    if presentations.is_empty() {
        return Err(Error::EmptyBatch);
    }
    for (vk, presentation) in presentations {
        if !presentation.verify_proof_parts(pp, key, vk, context) {
            return Ok(false);
        }
    }
    Ok(batch_multi_issuer(
        pp,
        presentations
            .iter()
            .map(|(vk, p)| (*vk, &p.commitment, &p.signature)),
        rng,
    ))
}

/// The batched verification paths, one variant per protocol configuration.
///
/// "Private" paths carry full presentations with opening proofs and selective disclosure;
/// the plain paths verify bare signatures over commitments whose openings the verifier has
/// checked by other means.
#[derive(Debug)]
pub enum BatchVerification<'a, const N: usize> {
    /// Bare signatures under one shared issuer key.
    SingleIssuer {
        /// The shared issuer key.
        vk: &'a VerificationKey,
        /// The commitment/signature pairs to verify.
        credentials: &'a [(Commitment<N>, Signature)],
    },
    /// Bare signatures under distinct issuer keys.
    MultiIssuer {
        /// The keyed commitment/signature triples to verify.
        credentials: &'a [(&'a VerificationKey, Commitment<N>, Signature)],
    },
    /// Presentations with opening proofs, under one shared issuer key.
    PrivateSingleIssuer {
        /// The commitment key the opening proofs are formed over.
        key: &'a CommitmentKey<N>,
        /// The shared issuer key.
        vk: &'a VerificationKey,
        /// The presentations to verify.
        presentations: &'a [Presentation<N>],
        /// The context the presentations were bound to.
        context: &'a [u8],
    },
    /// Presentations with opening proofs, under distinct issuer keys.
    PrivateMultiIssuer {
        /// The commitment key the opening proofs are formed over.
        key: &'a CommitmentKey<N>,
        /// The keyed presentations to verify.
        presentations: &'a [(&'a VerificationKey, Presentation<N>)],
        /// The context the presentations were bound to.
        context: &'a [u8],
    },
}

impl<'a, const N: usize> BatchVerification<'a, N> {
    /// Run the verification path selected by this variant.
    pub fn verify(
        &self,
        pp: &PublicParameters<N>,
        rng: &mut impl Rng,
    ) -> Result<bool, Error> {
        match self {
            BatchVerification::SingleIssuer { vk, credentials } => {
                verify_signatures_batch(pp, vk, credentials, rng)
            }
            BatchVerification::MultiIssuer { credentials } => {
                verify_signatures_multi_issuer(pp, credentials, rng)
            }
            BatchVerification::PrivateSingleIssuer {
                key,
                vk,
                presentations,
                context,
            } => verify_presentations_batch(pp, key, vk, presentations, context, rng),
            BatchVerification::PrivateMultiIssuer {
                key,
                presentations,
                context,
            } => verify_presentations_multi_issuer(pp, key, presentations, context, rng),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{credential::IssuanceRequest, pointcheval_sanders::KeyPair, test::rng, Message};
    use ff::Field;

    const CONTEXT: &[u8] = b"presentation tests";

    fn issue_credential<const N: usize>(
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        kp: &KeyPair,
        msg: Message<N>,
        rng: &mut impl crate::Rng,
    ) -> Credential<N> {
        let (request, draft) = IssuanceRequest::new(pp, key, msg, CONTEXT, rng);
        let signature = kp.issue(pp, key, &request, CONTEXT, rng).unwrap();
        draft
            .obtain(pp, kp.verification_key(), signature, rng)
            .unwrap()
    }

    #[test]
    fn presentation_verifies() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);
        let credential =
            issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);

        let presentation = credential
            .present(&pp, &key, &[], CONTEXT, &mut rng)
            .unwrap();
        assert!(presentation.verify(&pp, &key, kp.verification_key(), CONTEXT));
    }

    #[test]
    fn presentations_are_unlinkable_group_elements() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);
        let credential =
            issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);

        let first = credential
            .present(&pp, &key, &[], CONTEXT, &mut rng)
            .unwrap();
        let second = credential
            .present(&pp, &key, &[], CONTEXT, &mut rng)
            .unwrap();
        assert_ne!(first.commitment, second.commitment);
        assert_ne!(first.signature, second.signature);
    }

    #[test]
    fn presentation_rejects_wrong_context() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);
        let credential =
            issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);

        let presentation = credential
            .present(&pp, &key, &[], CONTEXT, &mut rng)
            .unwrap();
        assert!(!presentation.verify(&pp, &key, kp.verification_key(), b"replayed elsewhere"));
    }

    #[test]
    fn presentation_rejects_wrong_issuer() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);
        let other_kp = KeyPair::new(&pp, &mut rng);
        let credential =
            issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);

        let presentation = credential
            .present(&pp, &key, &[], CONTEXT, &mut rng)
            .unwrap();
        assert!(!presentation.verify(&pp, &key, other_kp.verification_key(), CONTEXT));
    }

    #[test]
    fn disclosure_round_trip() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);
        let msg = Message::new([
            Scalar::from(21),
            Scalar::from(34),
            Scalar::from(55),
            Scalar::from(89),
        ]);
        let credential = issue_credential(&pp, &key, &kp, msg, &mut rng);

        let presentation = credential
            .present(&pp, &key, &[1, 3], CONTEXT, &mut rng)
            .unwrap();
        assert!(presentation.verify(&pp, &key, kp.verification_key(), CONTEXT));

        let disclosed = presentation.disclosures();
        assert_eq!(disclosed.len(), 2);
        assert_eq!((disclosed[0].index(), disclosed[0].value()), (1, Scalar::from(34)));
        assert_eq!((disclosed[1].index(), disclosed[1].value()), (3, Scalar::from(89)));
    }

    #[test]
    fn disclosure_lie_is_rejected() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);
        let credential =
            issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);

        let mut presentation = credential
            .present(&pp, &key, &[0], CONTEXT, &mut rng)
            .unwrap();
        presentation.disclosures[0].value += Scalar::one();
        assert!(!presentation.verify(&pp, &key, kp.verification_key(), CONTEXT));
    }

    #[test]
    fn disclosure_out_of_range_is_rejected_up_front() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);
        let credential =
            issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);

        assert_eq!(
            credential
                .present(&pp, &key, &[4], CONTEXT, &mut rng)
                .unwrap_err(),
            Error::DisclosureOutOfRange {
                index: 4,
                length: 4
            }
        );
    }

    #[test]
    fn batch_verifies_honest_presentations() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let presentations = (0..5)
            .map(|_| {
                issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng)
                    .present(&pp, &key, &[], CONTEXT, &mut rng)
                    .unwrap()
            })
            .collect::<Vec<_>>();

        assert!(verify_presentations_batch(
            &pp,
            &key,
            kp.verification_key(),
            &presentations,
            CONTEXT,
            &mut rng
        )
        .unwrap());
    }

    #[test]
    fn batch_rejects_one_forged_signature_among_k() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let mut presentations = (0..5)
            .map(|_| {
                issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng)
                    .present(&pp, &key, &[], CONTEXT, &mut rng)
                    .unwrap()
            })
            .collect::<Vec<_>>();

        // Swap in another presentation's signature: every individual component is well-formed,
        // but the third credential's signing equation no longer holds.
        let foreign_signature = presentations[4].signature;
        presentations[2].signature = foreign_signature;

        // The aggregated pairing check alone must catch the forgery, independent of the
        // transcript binding (which also breaks here, caught by the full verification below).
        assert!(!batch_single_issuer(
            &pp,
            kp.verification_key(),
            presentations.iter().map(|p| (&p.commitment, &p.signature)),
            &mut rng
        ));
        assert!(!verify_presentations_batch(
            &pp,
            &key,
            kp.verification_key(),
            &presentations,
            CONTEXT,
            &mut rng
        )
        .unwrap());
    }

    #[test]
    fn multi_issuer_batch_verifies_and_rejects() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let issuers = (0..3).map(|_| KeyPair::new(&pp, &mut rng)).collect::<Vec<_>>();

        let mut keyed_presentations = issuers
            .iter()
            .map(|kp| {
                let presentation =
                    issue_credential(&pp, &key, kp, Message::random(&mut rng), &mut rng)
                        .present(&pp, &key, &[], CONTEXT, &mut rng)
                        .unwrap();
                (kp.verification_key(), presentation)
            })
            .collect::<Vec<_>>();

        assert!(verify_presentations_multi_issuer(
            &pp,
            &key,
            &keyed_presentations,
            CONTEXT,
            &mut rng
        )
        .unwrap());

        // Attribute one presentation to the wrong issuer; its signing equation breaks while
        // everything else stays intact.
        keyed_presentations[1].0 = issuers[0].verification_key();
        assert!(!batch_multi_issuer(
            &pp,
            keyed_presentations
                .iter()
                .map(|(vk, p)| (*vk, &p.commitment, &p.signature)),
            &mut rng
        ));
    }

    #[test]
    fn signature_batch_matches_individual_verification() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let mut credentials = (0..4)
            .map(|_| {
                let credential =
                    issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);
                (*credential.commitment(), *credential.signature())
            })
            .collect::<Vec<_>>();

        let all_pass = credentials
            .iter()
            .all(|(c, s)| kp.verification_key().verify(&pp, c, s));
        assert!(all_pass);
        assert!(
            verify_signatures_batch(&pp, kp.verification_key(), &credentials, &mut rng).unwrap()
        );

        // Replace exactly one signature with one from a different issuer.
        let forger = KeyPair::new(&pp, &mut rng);
        credentials[1].1 = forger.blind_sign(&pp, &credentials[1].0, &mut rng);
        assert!(!kp
            .verification_key()
            .verify(&pp, &credentials[1].0, &credentials[1].1));
        assert!(
            !verify_signatures_batch(&pp, kp.verification_key(), &credentials, &mut rng).unwrap()
        );
    }

    #[test]
    fn empty_batches_are_rejected() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        assert_eq!(
            verify_signatures_batch(&pp, kp.verification_key(), &[], &mut rng),
            Err(Error::EmptyBatch)
        );
        assert_eq!(
            verify_presentations_batch(&pp, &key, kp.verification_key(), &[], CONTEXT, &mut rng),
            Err(Error::EmptyBatch)
        );
        assert_eq!(
            verify_signatures_multi_issuer(&pp, &[], &mut rng),
            Err(Error::EmptyBatch)
        );
        assert_eq!(
            verify_presentations_multi_issuer(&pp, &key, &[], CONTEXT, &mut rng),
            Err(Error::EmptyBatch)
        );
    }

    #[test]
    fn batch_dispatch_covers_all_variants() {
        let mut rng = rng();
        let pp = PublicParameters::<4>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let credential = issue_credential(&pp, &key, &kp, Message::random(&mut rng), &mut rng);
        let bare = vec![(*credential.commitment(), *credential.signature())];
        let keyed_bare = vec![(
            kp.verification_key(),
            *credential.commitment(),
            *credential.signature(),
        )];
        let presentations = vec![credential
            .present(&pp, &key, &[], CONTEXT, &mut rng)
            .unwrap()];
        let keyed_presentations =
            vec![(kp.verification_key(), presentations[0].clone())];

        let variants = [
            BatchVerification::SingleIssuer {
                vk: kp.verification_key(),
                credentials: &bare,
            },
            BatchVerification::MultiIssuer {
                credentials: &keyed_bare,
            },
            BatchVerification::PrivateSingleIssuer {
                key: &key,
                vk: kp.verification_key(),
                presentations: &presentations,
                context: CONTEXT,
            },
            BatchVerification::PrivateMultiIssuer {
                key: &key,
                presentations: &keyed_presentations,
                context: CONTEXT,
            },
        ];
        for variant in &variants {
            assert!(variant.verify(&pp, &mut rng).unwrap());
        }
    }
}
