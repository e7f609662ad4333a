//! # Permutations
//!
//! This module provides two representations of a bijection on `0..n` and a
//! cycle type, all sharing the [`Permutation`] capability.
//!
//! ## Key Features:
//!
//! - **Representations**:
//!   - [`DensePermutation`] stores the image of every point (`images[i]` is the
//!     image of `i`). Lookup is a slice index.
//!   - [`SparsePermutation`] stores the domain size and only the points that
//!     move. Everything absent from its map is a fixed point.
//!   - [`Cycle`] is a single orbit, read cyclically.
//! - **Construction**:
//!   - Identity: `DensePermutation::identity(n)`, `SparsePermutation::identity(n)`.
//!   - From images: `DensePermutation::from_images(vec![...])`, rejecting
//!     sequences that are not bijections.
//!   - From moved points: `SparsePermutation::from_pairs(n, [(0, 1), (1, 0)])`.
//!   - Random: `DensePermutation::random(n, &mut rng)`.
//! - **Operations**:
//!   - Inverse: `p.inverse()`.
//!   - Composition: `a.compose(&b)` or `&a * &b` (applies `b` then `a`). When the
//!     sizes differ the smaller operand is extended by the identity, and the
//!     result has the larger size.
//!   - Cycle decomposition: `p.cycles()`, fixed points omitted, each cycle
//!     starting at its smallest point, cycles in order of their smallest point.
//!   - Order: `p.order()`, the lcm of the cycle lengths.
//! - **Text**: `Display`/`FromStr` in the `"n : ..."` form, and cycle notation
//!   with the alternate flag (`{:#}`).
//!
//! Dense and sparse permutations built from the same images agree on every
//! operation, and compare equal to each other.

use itertools::Itertools;
use thiserror::Error;

use crate::num_traits::GcdLcm;

mod cycle;
mod dense;
mod sparse;
mod text;

pub use cycle::Cycle;
pub use dense::DensePermutation;
pub use sparse::SparsePermutation;
pub use text::ParsePermutationError;

#[cfg(test)]
mod tests;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("point {point} is outside the domain 0..{size}")]
    PointOutOfRange { point: usize, size: usize },

    #[error("image {image} of point {point} is outside the domain 0..{size}")]
    ImageOutOfRange {
        point: usize,
        image: usize,
        size: usize,
    },

    #[error("image {image} is shared by points {first} and {second}")]
    RepeatedImage {
        image: usize,
        first: usize,
        second: usize,
    },

    #[error("point {point} is listed more than once")]
    RepeatedPoint { point: usize },

    #[error("point {point} maps to {image}, which is not moved by any listed point")]
    NotABijection { point: usize, image: usize },

    #[error("a cycle needs at least one element")]
    EmptyCycle,

    #[error("order does not fit in 128 bits")]
    OrderOverflow,
}

/// A finite permutation, viewed through point lookup and its cycles.
///
/// Implemented by [`DensePermutation`], [`SparsePermutation`] and [`Cycle`].
/// Code that only needs to read a permutation can be generic over this trait.
///
/// # Examples
///
/// ```
/// use permcycles::permutation::{DensePermutation, Permutation, SparsePermutation};
///
/// fn describe(p: &impl Permutation) -> (u128, Vec<usize>) {
///     (p.order(), p.fixed_points())
/// }
///
/// let dense = DensePermutation::from_images(vec![1, 2, 0, 3]).unwrap();
/// let sparse = SparsePermutation::from(&dense);
/// assert_eq!(describe(&dense), (3, vec![3]));
/// assert_eq!(describe(&dense), describe(&sparse));
/// ```
pub trait Permutation {
    /// Number of points in the domain.
    fn size(&self) -> usize;

    /// Image of `point`.
    ///
    /// # Panics
    ///
    /// Dense and sparse permutations panic when `point >= self.size()`.
    /// A [`Cycle`] fixes every point that is not one of its elements.
    fn image(&self, point: usize) -> usize;

    /// Non-trivial cycles, in order of their smallest point.
    fn cycles(&self) -> Vec<Cycle>;

    /// Image of `point`, or an error when it lies outside the domain.
    fn try_image(&self, point: usize) -> Result<usize, PermutationError> {
        let size = self.size();
        if point < size {
            Ok(self.image(point))
        } else {
            Err(PermutationError::PointOutOfRange { point, size })
        }
    }

    /// Smallest `k > 0` such that applying the permutation `k` times is the identity.
    fn try_order(&self) -> Result<u128, PermutationError> {
        order_of_cycles(&self.cycles())
    }

    /// See [`Permutation::try_order`].
    ///
    /// # Panics
    ///
    /// If the order does not fit in a `u128`. This needs a domain of many
    /// hundreds of points split into cycles of coprime lengths.
    fn order(&self) -> u128 {
        match self.try_order() {
            Ok(order) => order,
            Err(err) => panic!("{err}"),
        }
    }

    /// One-line notation: the image of every point in `0..size`.
    fn images(&self) -> Vec<usize> {
        (0..self.size()).map(|i| self.image(i)).collect()
    }

    /// Points mapped to themselves, ascending.
    fn fixed_points(&self) -> Vec<usize> {
        (0..self.size()).filter(|&i| self.image(i) == i).collect()
    }

    /// `true` when no point is fixed.
    fn is_derangement(&self) -> bool {
        (0..self.size()).all(|i| self.image(i) != i)
    }

    fn is_identity(&self) -> bool {
        (0..self.size()).all(|i| self.image(i) == i)
    }

    /// Lengths of the non-trivial cycles, ascending.
    fn cycle_type(&self) -> Vec<usize> {
        self.cycles().iter().map(Cycle::len).sorted().collect()
    }

    /// `1` for even permutations, `-1` for odd ones.
    fn sign(&self) -> i8 {
        // a cycle of length k is a product of k - 1 transpositions
        let even_length = self.cycles().iter().filter(|c| c.len() % 2 == 0).count();
        if even_length % 2 == 0 {
            1
        } else {
            -1
        }
    }
}

/// Folds cycle lengths into their lcm, starting from 1.
pub(crate) fn order_of_cycles(cycles: &[Cycle]) -> Result<u128, PermutationError> {
    cycles.iter().try_fold(1u128, |order, cycle| {
        order
            .checked_lcm(cycle.len() as u128)
            .ok_or(PermutationError::OrderOverflow)
    })
}
