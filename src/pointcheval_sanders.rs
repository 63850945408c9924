//! Randomizable Pointcheval-Sanders-style signatures over committed attribute vectors, and
//! issuer keys, over BLS12-381.
//!
//! The signature shape follows the 2016 paper ["Short randomizable
//! signatures"](https://eprint.iacr.org/2015/525.pdf), adapted to sign a dual-group Pedersen
//! [`Commitment`] directly: the issuer certifies the committed attribute vector without ever
//! seeing the attributes. A signature can be rerandomized in step with a commitment
//! rerandomization, which is what makes repeated presentations of the same credential
//! unlinkable.

use crate::{
    common::*,
    pedersen::{Commitment, PublicParameters},
    proofs::{ChallengeBuilder, ChallengeInput},
    serde::SerializeElement,
};
use serde::{Deserialize, Serialize};

/// An issuer's signing key.
///
/// This is exclusively owned by the issuer: it implements neither `Clone` nor `Serialize`, and
/// it never appears inside any holder- or verifier-visible object.
#[derive(Debug)]
pub(crate) struct SecretKey {
    /// The signing exponent.
    x: Scalar,
    /// g1 · x, cached because every signature adds it to the commitment being signed.
    x1: G1Affine,
}

/// An issuer's public verification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    /// g1 · x.
    #[serde(with = "SerializeElement")]
    pub x1: G1Affine,
    /// g2 · x.
    #[serde(with = "SerializeElement")]
    pub x2: G2Affine,
}

/// An issuer keypair formed from a `SecretKey` and a [`VerificationKey`].
#[derive(Debug)]
pub struct KeyPair {
    sk: SecretKey,
    vk: VerificationKey,
}

impl SecretKey {
    /// Generate a new `SecretKey` from a nonzero exponent chosen uniformly at random.
    fn new<const N: usize>(pp: &PublicParameters<N>, rng: &mut impl Rng) -> Self {
        let x = random_nonzero(rng);
        let x1 = (pp.g1() * x).into();
        SecretKey { x, x1 }
    }

    /// Sign a commitment.
    pub(crate) fn blind_sign<const N: usize>(
        &self,
        pp: &PublicParameters<N>,
        commitment: &Commitment<N>,
        rng: &mut impl Rng,
    ) -> Signature {
        let u = random_nonzero(rng);

        Signature {
            // sigma1 = g1 * [u]
            sigma1: (pp.g1() * u).into(),
            // sigma2 = (g1 * [x] + cmg1) * [u]
            sigma2: ((self.x1 + commitment.to_g1()) * u).into(),
        }
    }
}

impl VerificationKey {
    /// Derive the `VerificationKey` from an existing [`SecretKey`].
    fn from_secret_key<const N: usize>(sk: &SecretKey, pp: &PublicParameters<N>) -> Self {
        VerificationKey {
            x1: sk.x1,
            x2: (pp.g2() * sk.x).into(),
        }
    }

    /// Verify a signature on a commitment.
    ///
    /// Checks the signing equation e(sigma2, g2) = e(sigma1, x2 + cmg2) together with the
    /// dual-group consistency of the commitment itself, so a commitment received from an
    /// untrusted holder needs no separate check. An invalid signature is an ordinary outcome,
    /// reported as `false`.
    pub fn verify<const N: usize>(
        &self,
        pp: &PublicParameters<N>,
        commitment: &Commitment<N>,
        sig: &Signature,
    ) -> bool {
        if !sig.is_well_formed() {
            return false;
        }

        let g2_prepared = G2Prepared::from(*pp.g2());
        let rhs_prepared = G2Prepared::from((self.x2 + commitment.to_g2()).to_affine());
        let signing_equation = multi_miller_loop(&[
            (&sig.sigma2, &g2_prepared),
            (&-sig.sigma1, &rhs_prepared),
        ])
        .final_exponentiation()
            == Gt::identity();

        signing_equation && commitment.consistency_check(pp)
    }
}

impl ChallengeInput for VerificationKey {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume_bytes(self.x1.to_bytes());
        builder.consume_bytes(self.x2.to_bytes());
    }
}

impl KeyPair {
    /// Generate a new issuer `KeyPair` against the given public parameters.
    pub fn new<const N: usize>(pp: &PublicParameters<N>, rng: &mut impl Rng) -> Self {
        let sk = SecretKey::new(pp, rng);
        let vk = VerificationKey::from_secret_key(&sk, pp);
        KeyPair { sk, vk }
    }

    /// Get the public portion of the `KeyPair`.
    pub fn verification_key(&self) -> &VerificationKey {
        &self.vk
    }

    /// Sign a commitment without learning its opening.
    ///
    /// **Warning**: this should *only* be used if the issuer has verified a proof of knowledge
    /// of the opening of the commitment; [`KeyPair::issue`](crate::credential) does both.
    pub fn blind_sign<const N: usize>(
        &self,
        pp: &PublicParameters<N>,
        commitment: &Commitment<N>,
        rng: &mut impl Rng,
    ) -> Signature {
        self.sk.blind_sign(pp, commitment, rng)
    }
}

/// A signature over a committed attribute vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// First part of a signature.
    ///
    /// In some papers, this is denoted `h`.
    #[serde(with = "SerializeElement")]
    sigma1: G1Affine,
    /// Second part of a signature.
    ///
    /// In some papers, this is denoted `H`.
    #[serde(with = "SerializeElement")]
    sigma2: G1Affine,
}

impl Signature {
    /// Produce a signature valid for the commitment rerandomized with `delta_r`, itself
    /// rerandomized by the fresh nonzero scalar `delta_u`.
    ///
    /// The original signature is left untouched; the result is unlinkable to it.
    pub fn randomize(&self, delta_r: Scalar, delta_u: Scalar) -> Signature {
        Signature {
            sigma1: (self.sigma1 * delta_u).into(),
            sigma2: ((self.sigma2 + self.sigma1 * delta_r) * delta_u).into(),
        }
    }

    /// Convert to a bytewise representation.
    pub fn as_bytes(&self) -> [u8; 96] {
        let mut buf: [u8; 96] = [0; 96];
        buf[..48].copy_from_slice(&self.sigma1.to_compressed());
        buf[48..].copy_from_slice(&self.sigma2.to_compressed());
        buf
    }

    /// Check whether the signature is well-formed.
    ///
    /// This checks that the first element is not the identity element. This implementation uses
    /// only checked APIs to ensure that both parts of the signature are in the expected group
    /// (G1).
    pub fn is_well_formed(&self) -> bool {
        !bool::from(self.sigma1.is_identity())
    }

    /// Extract the sigma_1 or `h` component.
    pub fn sigma1(self) -> G1Affine {
        self.sigma1
    }

    /// Extract the sigma_2 or `H` component.
    pub fn sigma2(self) -> G1Affine {
        self.sigma2
    }
}

impl ChallengeInput for Signature {
    fn consume(&self, builder: &mut ChallengeBuilder) {
        builder.consume(&self.sigma1);
        builder.consume(&self.sigma2);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pedersen::CommitmentKey;
    use crate::test::rng;

    #[test]
    fn verify_signed_commitment() {
        let mut rng = rng();
        let pp = PublicParameters::<3>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let msg = Message::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);
        let com = msg.commit(&pp, &key, bf);

        let sig = kp.blind_sign(&pp, &com, &mut rng);
        assert!(
            kp.verification_key().verify(&pp, &com, &sig),
            "Signature didn't verify!!"
        );
    }

    #[test]
    fn fail_verification_of_different_commitment() {
        let mut rng = rng();
        let pp = PublicParameters::<3>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let msg = Message::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);
        let com = msg.commit(&pp, &key, bf);
        let sig = kp.blind_sign(&pp, &com, &mut rng);

        let bad_com = Message::random(&mut rng).commit(&pp, &key, bf);
        assert!(
            !kp.verification_key().verify(&pp, &bad_com, &sig),
            "Signature verified on the wrong commitment!"
        );
    }

    #[test]
    fn fail_verification_with_wrong_keypair() {
        let mut rng = rng();
        let pp = PublicParameters::<3>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let msg = Message::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);
        let com = msg.commit(&pp, &key, bf);

        let bad_kp = KeyPair::new(&pp, &mut rng);
        let bad_sig = bad_kp.blind_sign(&pp, &com, &mut rng);

        assert!(
            !kp.verification_key().verify(&pp, &com, &bad_sig),
            "Signature from a different keypair verified!"
        );
    }

    #[test]
    fn fail_unit_signature() {
        let mut rng = rng();
        let pp = PublicParameters::<3>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let msg = Message::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);
        let com = msg.commit(&pp, &key, bf);

        let bad_sig = Signature {
            sigma1: G1Affine::identity(),
            sigma2: G1Projective::random(&mut rng).into(),
        };

        assert!(
            !kp.verification_key().verify(&pp, &com, &bad_sig),
            "Bad signature with sigma1 = 1 verified!"
        );
    }

    #[test]
    fn fail_inconsistent_commitment() {
        let mut rng = rng();
        let pp = PublicParameters::<3>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let msg = Message::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);
        let com = msg.commit(&pp, &key, bf);
        let sig = kp.blind_sign(&pp, &com, &mut rng);

        // A commitment whose G1 component does not match its G2 component must be rejected
        // even though the signing equation alone only involves the G2 component.
        let other = Message::random(&mut rng).commit(&pp, &key, BlindingFactor::new(&mut rng));
        let forged_com = Commitment::from_parts(other.to_g1(), com.to_g2());
        assert!(!kp.verification_key().verify(&pp, &forged_com, &sig));
    }

    #[test]
    fn randomized_signatures_verify_against_rerandomized_commitment() {
        let mut rng = rng();
        let pp = PublicParameters::<3>::new(&mut rng);
        let key = CommitmentKey::new(&pp, &mut rng).unwrap();
        let kp = KeyPair::new(&pp, &mut rng);

        let msg = Message::random(&mut rng);
        let bf = BlindingFactor::new(&mut rng);
        let com = msg.commit(&pp, &key, bf);
        let sig = kp.blind_sign(&pp, &com, &mut rng);

        let delta = BlindingFactor::new(&mut rng);
        let delta_u = random_nonzero(&mut rng);
        let rerandomized_com = com.rerandomize(&pp, delta);
        let randomized_sig = sig.randomize(delta.as_scalar(), delta_u);

        assert!(kp
            .verification_key()
            .verify(&pp, &rerandomized_com, &randomized_sig));

        // The randomized signature does not verify against the old commitment, nor vice versa.
        assert!(!kp.verification_key().verify(&pp, &com, &randomized_sig));
        assert!(!kp.verification_key().verify(&pp, &rerandomized_com, &sig));
    }
}
