//! Multi-scalar multiplication over the BLS12-381 groups.
//!
//! Computes Σ scalars\[i\] · bases\[i\] with a windowed bucket method \[1\] instead of one
//! scalar multiplication per term. The commitment and proof-verification equations in this
//! crate route their inner products through [`msm`]; [`msm_naive`] is the term-by-term
//! reference sum, which must agree with [`msm`] bit-for-bit on every input.
//!
//! ## References
//!
//! 1. Nicholas Pippenger. "On the evaluation of powers and monomials". SIAM Journal on
//!    Computing, 9(2). 1980.

use crate::common::*;

/// Scalars are 255 bits; every window past this holds only zero digits.
const SCALAR_BITS: usize = 256;

/// Compute Σ scalars\[i\] · bases\[i\] using the windowed bucket method.
///
/// Produces exactly the same group element as [`msm_naive`], in fewer group operations for
/// larger inputs.
///
/// Panics if `bases` and `scalars` have different lengths.
pub fn msm<G>(bases: &[G], scalars: &[Scalar]) -> G
where
    G: Group<Scalar = Scalar>,
{
    assert_eq!(
        bases.len(),
        scalars.len(),
        "bases and scalars must have the same length"
    );
    if bases.is_empty() {
        return G::identity();
    }

    let window = window_width(bases.len());
    let digits = scalars.iter().map(Scalar::to_bytes).collect::<Vec<_>>();
    let windows = (SCALAR_BITS + window - 1) / window;

    let mut acc = G::identity();
    for win in (0..windows).rev() {
        for _ in 0..window {
            acc = acc.double();
        }

        // One bucket per nonzero digit value in this window.
        let mut buckets = vec![G::identity(); (1 << window) - 1];
        for (base, bytes) in bases.iter().zip(digits.iter()) {
            let digit = window_digit(bytes, win * window, window);
            if digit != 0 {
                buckets[digit - 1] += *base;
            }
        }

        // Suffix sums weight bucket j by its digit value j+1.
        let mut running = G::identity();
        let mut window_sum = G::identity();
        for bucket in buckets.iter().rev() {
            running += *bucket;
            window_sum += running;
        }
        acc += window_sum;
    }
    acc
}

/// Compute Σ scalars\[i\] · bases\[i\] as a sequential sum of scalar multiplications.
///
/// Panics if `bases` and `scalars` have different lengths.
pub fn msm_naive<G>(bases: &[G], scalars: &[Scalar]) -> G
where
    G: Group<Scalar = Scalar>,
{
    assert_eq!(
        bases.len(),
        scalars.len(),
        "bases and scalars must have the same length"
    );
    bases
        .iter()
        .zip(scalars.iter())
        .map(|(base, scalar)| *base * *scalar)
        .sum()
}

fn window_width(terms: usize) -> usize {
    match terms {
        0..=7 => 3,
        8..=63 => 4,
        64..=255 => 6,
        _ => 8,
    }
}

/// Extract the `width`-bit digit starting at `start_bit` of a little-endian scalar encoding.
fn window_digit(bytes: &[u8; 32], start_bit: usize, width: usize) -> usize {
    let mut digit = 0;
    for bit in 0..width {
        let pos = start_bit + bit;
        if pos >= SCALAR_BITS {
            break;
        }
        if (bytes[pos / 8] >> (pos % 8)) & 1 == 1 {
            digit |= 1 << bit;
        }
    }
    digit
}
