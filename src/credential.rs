//! Holder-owned credentials and the blind issuance exchange.
//!
//! Issuance is a two-message protocol:
//!
//! 1. The holder commits to their attributes and sends an [`IssuanceRequest`]: the commitment
//!    together with a proof of knowledge of its opening, bound to a context string agreed with
//!    the issuer (e.g. the issuer's identity and a session nonce).
//! 2. The issuer checks the proof and the commitment's dual-group consistency and, if both
//!    hold, returns a blind signature over the commitment ([`KeyPair::issue`]). A failed check
//!    rejects the request without signing.
//!
//! The holder validates the returned signature and immediately rerandomizes both commitment and
//! signature ([`CredentialDraft::obtain`]), so the [`Credential`] it keeps is unlinkable to the
//! issuance transcript. The attribute vector and blinding factor never leave the holder.

use crate::{
    common::*,
    pedersen::{Commitment, CommitmentKey, PublicParameters},
    pointcheval_sanders::{KeyPair, Signature, VerificationKey},
    proofs::OpeningProof,
    Error,
};
use serde::{Deserialize, Serialize};

/// A request for a signature over a committed attribute vector.
///
/// This is the only issuance message that leaves the holder; it reveals nothing about the
/// attributes beyond the commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRequest<const N: usize> {
    commitment: Commitment<N>,
    proof: OpeningProof<N>,
}

/// Holder-side state between sending an [`IssuanceRequest`] and receiving the signature.
#[derive(Debug)]
pub struct CredentialDraft<const N: usize> {
    msg: Message<N>,
    bf: BlindingFactor,
    commitment: Commitment<N>,
}

/// A credential: an attribute vector, its commitment opening, and an issuer's signature over
/// the commitment.
///
/// The attribute vector and blinding factor are holder-only; the credential as a whole is never
/// transmitted. Presentations derive fresh rerandomized values from it instead.
#[derive(Debug)]
pub struct Credential<const N: usize> {
    msg: Message<N>,
    bf: BlindingFactor,
    commitment: Commitment<N>,
    signature: Signature,
    vk: VerificationKey,
}

impl<const N: usize> IssuanceRequest<N> {
    /// Commit to the given attributes and build a request for a signature over the commitment.
    ///
    /// Returns the request to send to the issuer and the draft the holder keeps to finish the
    /// protocol with [`CredentialDraft::obtain`].
    pub fn new(
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        msg: Message<N>,
        context: &[u8],
        rng: &mut impl Rng,
    ) -> (Self, CredentialDraft<N>) {
        let bf = BlindingFactor::new(rng);
        let commitment = msg.commit(pp, key, bf);
        let proof = OpeningProof::prove(pp, key, &msg, bf, &commitment, context, rng);
        (
            Self { commitment, proof },
            CredentialDraft {
                msg,
                bf,
                commitment,
            },
        )
    }

    /// The commitment the holder requests a signature over.
    pub fn commitment(&self) -> &Commitment<N> {
        &self.commitment
    }
}

impl KeyPair {
    /// Process an issuance request: verify the opening proof and the commitment's dual-group
    /// consistency, then sign the commitment.
    ///
    /// A request that fails either check is rejected with [`Error::InvalidProof`] and nothing
    /// is signed.
    pub fn issue<const N: usize>(
        &self,
        pp: &PublicParameters<N>,
        key: &CommitmentKey<N>,
        request: &IssuanceRequest<N>,
        context: &[u8],
        rng: &mut impl Rng,
    ) -> Result<Signature, Error> {
        if !request.commitment.consistency_check(pp)
            || !request.proof.verify(pp, key, &request.commitment, context)
        {
            return Err(Error::InvalidProof);
        }
        Ok(self.blind_sign(pp, &request.commitment, rng))
    }
}

impl<const N: usize> CredentialDraft<N> {
    /// Finish the issuance protocol: check the issuer's signature against the commitment, then
    /// rerandomize commitment and signature so the resulting credential is unlinkable to the
    /// issuance transcript.
    pub fn obtain(
        self,
        pp: &PublicParameters<N>,
        vk: &VerificationKey,
        signature: Signature,
        rng: &mut impl Rng,
    ) -> Result<Credential<N>, Error> {
        if !vk.verify(pp, &self.commitment, &signature) {
            return Err(Error::InvalidSignature);
        }
        let credential = Credential {
            msg: self.msg,
            bf: self.bf,
            commitment: self.commitment,
            signature,
            vk: *vk,
        };
        Ok(credential.rerandomize(pp, rng))
    }
}

impl<const N: usize> Credential<N> {
    /// Rerandomize with fresh randomness. The new credential certifies the same attributes and
    /// is unlinkable to the old one; the old one is left untouched.
    pub fn rerandomize(&self, pp: &PublicParameters<N>, rng: &mut impl Rng) -> Credential<N> {
        let delta = BlindingFactor::new(&mut *rng);
        let delta_u = random_nonzero(rng);
        self.rerandomize_with(pp, delta, delta_u)
    }

    /// Rerandomize with caller-chosen deltas: the commitment moves to blinding factor
    /// r + delta, and the signature follows.
    pub fn rerandomize_with(
        &self,
        pp: &PublicParameters<N>,
        delta: BlindingFactor,
        delta_u: Scalar,
    ) -> Credential<N> {
        Credential {
            msg: self.msg,
            bf: BlindingFactor::from_scalar(self.bf.as_scalar() + delta.as_scalar()),
            commitment: self.commitment.rerandomize(pp, delta),
            signature: self.signature.randomize(delta.as_scalar(), delta_u),
            vk: self.vk,
        }
    }

    /// The certified attribute vector.
    pub fn message(&self) -> &Message<N> {
        &self.msg
    }

    /// The blinding factor of the current commitment.
    pub fn blinding_factor(&self) -> BlindingFactor {
        self.bf
    }

    /// The current (rerandomized) commitment.
    pub fn commitment(&self) -> &Commitment<N> {
        &self.commitment
    }

    /// The current (rerandomized) signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The verification key of the issuer that signed this credential.
    pub fn verification_key(&self) -> &VerificationKey {
        &self.vk
    }
}
