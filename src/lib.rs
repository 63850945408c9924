//! This crate implements a pairing-based anonymous credential scheme instantiated over
//! BLS12-381:
//! - dual-group Pedersen commitments to attribute vectors, instantiated simultaneously in G1
//!   and G2.
//! - Pointcheval-Sanders-style blind signatures over committed attribute vectors (CT-RSA 2016).
//! - Schnorr-style zero-knowledge proofs of the opening of a commitment, made non-interactive
//!   with the Fiat-Shamir transform.
//! - unlinkable credential presentations with selective attribute disclosure, verifiable one at
//!   a time or in batches that share a single final exponentiation across many pairing checks.

#![warn(missing_docs)]
#![warn(missing_copy_implementations, missing_debug_implementations)]
#![warn(unused_qualifications, unused_results)]
#![warn(future_incompatible)]
#![warn(unused)]

pub mod credential;
pub mod msm;
pub mod pedersen;
pub mod pointcheval_sanders;
pub mod presentation;
pub mod proofs;

mod pairing_check;
mod serde;

pub use crate::serde::SerializeElement;

use crate::common::*;
use ::serde::*;
use ff::Field;
use std::ops::Deref;
use thiserror::*;

/// Error types that may arise from credential operations.
///
/// Failed signature and proof *verifications* are ordinary outcomes reported as `bool`s; the
/// variants here cover setup invariants and malformed protocol inputs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A freshly generated commitment key failed its defining pairing equation. This indicates
    /// a broken group-arithmetic backend and is not recoverable.
    #[error("commitment key bases at index {0} fail the pairing consistency check")]
    InconsistentCommitmentKey(usize),
    /// An issuance request carried a proof of knowledge that did not verify.
    #[error("proof of knowledge of the commitment opening failed to verify")]
    InvalidProof,
    /// A signature presented during issuance did not verify against the commitment.
    #[error("signature failed to verify against the commitment")]
    InvalidSignature,
    /// A batch verification was invoked on an empty batch.
    #[error("batch verification requires at least one credential")]
    EmptyBatch,
    /// Caused by requesting disclosure of an attribute index the credential does not have.
    #[error("attribute index {index} out of range for a credential with {length} attributes")]
    DisclosureOutOfRange {
        /// The requested attribute index.
        index: usize,
        /// The number of attributes in the credential.
        length: usize,
    },
}

/// A trait synonym for a cryptographically secure random number generator. This trait is
/// blanket-implemented for all valid types and will never need to be implemented by-hand.
pub trait Rng: rand::CryptoRng + rand::RngCore {}
impl<T: rand::CryptoRng + rand::RngCore> Rng for T {}

/// Fixed-length attribute vector certified by a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<const N: usize>([Scalar; N]);

impl<const N: usize> Deref for Message<N> {
    type Target = [Scalar; N];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> Message<N> {
    /// Create a new message from an array of attribute values.
    pub fn new(scalars: [Scalar; N]) -> Self {
        Message(scalars)
    }

    /// Create a message with attributes sampled uniformly at random.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut scalars = [Scalar::zero(); N];
        for scalar in scalars.iter_mut() {
            *scalar = Scalar::random(&mut *rng);
        }
        Message(scalars)
    }
}

impl From<Scalar> for Message<1> {
    fn from(scalar: Scalar) -> Self {
        Self([scalar])
    }
}

/// Blinding factor for a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindingFactor(#[serde(with = "SerializeElement")] Scalar);

impl BlindingFactor {
    /// Generate a new blinding factor uniformly at random from the set of possible [`Scalar`]s.
    pub fn new(rng: &mut impl Rng) -> Self {
        Self(Scalar::random(rng))
    }

    /// Construct a blinding factor from the scalar representing it.
    pub fn from_scalar(scalar: Scalar) -> Self {
        Self(scalar)
    }

    /// Convert to the inner scalar representing this blinding factor.
    pub fn as_scalar(&self) -> Scalar {
        self.0
    }
}

mod common {
    //! Common types used internally.

    pub use crate::{BlindingFactor, Message, Rng};
    pub use bls12_381::{
        multi_miller_loop, pairing, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective,
        Gt, Scalar,
    };
    pub use group::{Curve, Group, GroupEncoding};

    use ff::Field;

    /// Select a nonzero scalar uniformly at random.
    pub fn random_nonzero(rng: &mut impl Rng) -> Scalar {
        loop {
            let r = Scalar::random(&mut *rng);
            if !r.is_zero() {
                return r;
            }
        }
    }

    /// Select a non-identity element from the group uniformly at random.
    pub fn random_non_identity<G>(rng: &mut impl Rng) -> G
    where
        G: Group<Scalar = Scalar>,
    {
        loop {
            let g = G::random(&mut *rng);
            if !bool::from(g.is_identity()) {
                return g;
            }
        }
    }
}
