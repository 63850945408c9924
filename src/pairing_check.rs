//! Accumulator for aggregated pairing-product checks of the form Π e(a_i, b_i) = 1.
//!
//! Batched verification pushes the terms of many pairing equations into one accumulator, runs a
//! single multi-Miller loop over all of them, and performs exactly one final exponentiation
//! (the dominant per-pairing cost) instead of one per equation.
//!
//! Soundness of aggregation is the caller's responsibility: distinct equations must each be
//! scaled by an independent uniformly random nonzero scalar before their terms are pushed,
//! otherwise a forged term in one equation can cancel against another. The verification
//! routines in [`crate::presentation`] sample one such scalar per equation.

use crate::common::*;

/// Collected G1 × G2 terms of one or more pairing equations, checked together against the
/// identity in Gt.
#[derive(Debug)]
pub(crate) struct PairingCheck {
    terms: Vec<(G1Projective, G2Projective)>,
}

impl PairingCheck {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add the term e(a, b) to the aggregated product.
    pub fn push(&mut self, a: G1Projective, b: G2Projective) {
        self.terms.push((a, b));
    }

    /// Run the Miller loops over every collected term and one final exponentiation; the check
    /// passes if the aggregated product is the identity.
    pub fn verify(self) -> bool {
        let g1s = self
            .terms
            .iter()
            .map(|(a, _)| a.to_affine())
            .collect::<Vec<_>>();
        let g2s = self
            .terms
            .iter()
            .map(|(_, b)| G2Prepared::from(b.to_affine()))
            .collect::<Vec<_>>();
        let terms = g1s.iter().zip(g2s.iter()).collect::<Vec<_>>();

        multi_miller_loop(&terms).final_exponentiation() == Gt::identity()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::rng;
    use ff::Field;

    #[test]
    fn empty_check_passes() {
        assert!(PairingCheck::new().verify());
    }

    #[test]
    fn single_equation_passes() {
        let mut rng = rng();
        let a = G1Projective::random(&mut rng);
        let b = G2Projective::random(&mut rng);

        // e(a, b) * e(-a, b) = 1.
        let mut check = PairingCheck::new();
        check.push(a, b);
        check.push(-a, b);
        assert!(check.verify());
    }

    #[test]
    fn unbalanced_equation_fails() {
        let mut rng = rng();
        let a = G1Projective::random(&mut rng);
        let b = G2Projective::random(&mut rng);

        let mut check = PairingCheck::new();
        check.push(a, b);
        check.push(a, b);
        assert!(!check.verify());
    }

    #[test]
    fn scaled_equations_accumulate() {
        let mut rng = rng();
        let mut check = PairingCheck::new();
        for _ in 0..3 {
            let a = G1Projective::random(&mut rng);
            let b = G2Projective::random(&mut rng);
            let rho = Scalar::random(&mut rng);
            check.push(a * rho, b);
            check.push(-a * rho, b);
        }
        assert!(check.verify());
    }
}
