//! Primitive components of zero-knowledge proofs: Fiat-Shamir challenges and Schnorr-style
//! proofs of knowledge of the opening of a commitment.

mod challenge;
mod opening;

pub use self::{challenge::*, opening::*};
