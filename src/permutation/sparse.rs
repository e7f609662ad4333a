use std::{collections::BTreeMap, ops::Mul};

use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use log::{debug, trace};
use rand::Rng;

use super::{
    cycle::{decompose, Cycle},
    dense::validate_images,
    DensePermutation, Permutation, PermutationError,
};

/// A permutation of `0..size` that stores only the points it moves.
///
/// Lookups fall back to the identity for points absent from the map, so the
/// cost of decomposition and composition follows the number of moved
/// points rather than the domain size.
///
/// # Examples
///
/// ```
/// use permcycles::permutation::{Permutation, SparsePermutation};
///
/// let p = SparsePermutation::from_images(vec![1, 0, 3, 2]).unwrap();
/// assert!(p.is_derangement());
/// assert_eq!(p.order(), 2);
///
/// let q = SparsePermutation::from_pairs(1_000_000, [(10, 20), (20, 10)]).unwrap();
/// assert_eq!(q.image(10), 20);
/// assert_eq!(q.image(999_999), 999_999);
/// assert_eq!(q.cycles().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SparseRepr", into = "SparseRepr")
)]
pub struct SparsePermutation {
    size: usize,
    // point -> image, only for image != point
    non_trivial: BTreeMap<usize, usize>,
}

impl SparsePermutation {
    /// The identity on `0..n`; stores nothing.
    pub fn identity(n: usize) -> Self {
        SparsePermutation {
            size: n,
            non_trivial: BTreeMap::new(),
        }
    }

    /// Builds a permutation from its one-line notation, keeping only moved points.
    ///
    /// Fails if an image is out of range or repeated.
    pub fn from_images(images: Vec<usize>) -> Result<Self, PermutationError> {
        if let Err(err) = validate_images(&images) {
            debug!("rejected image sequence of length {}: {err}", images.len());
            return Err(err);
        }
        let non_trivial = images
            .iter()
            .enumerate()
            .filter(|&(point, &image)| point != image)
            .map(|(point, &image)| (point, image))
            .collect();
        Ok(SparsePermutation {
            size: images.len(),
            non_trivial,
        })
    }

    /// Builds a permutation of `0..size` from `(point, image)` pairs.
    /// Unlisted points are fixed and pairs `(k, k)` are accepted and dropped.
    ///
    /// Fails if a point or image is out of range, a point is listed twice, or
    /// the pairs do not close up into a bijection.
    ///
    /// ```
    /// # use permcycles::permutation::{PermutationError, SparsePermutation};
    /// assert!(SparsePermutation::from_pairs(5, [(0, 3), (3, 0), (4, 4)]).is_ok());
    /// assert_eq!(
    ///     SparsePermutation::from_pairs(5, [(0, 3)]),
    ///     Err(PermutationError::NotABijection { point: 0, image: 3 })
    /// );
    /// ```
    pub fn from_pairs<I>(size: usize, pairs: I) -> Result<Self, PermutationError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let result = Self::collect_pairs(size, pairs);
        if let Err(err) = &result {
            debug!("rejected sparse pairs on 0..{size}: {err}");
        }
        result
    }

    fn collect_pairs<I>(size: usize, pairs: I) -> Result<Self, PermutationError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut listed = AHashSet::new();
        let mut non_trivial = BTreeMap::new();
        for (point, image) in pairs {
            if point >= size {
                return Err(PermutationError::PointOutOfRange { point, size });
            }
            if image >= size {
                return Err(PermutationError::ImageOutOfRange { point, image, size });
            }
            if !listed.insert(point) {
                return Err(PermutationError::RepeatedPoint { point });
            }
            if point != image {
                non_trivial.insert(point, image);
            }
        }

        // images must be distinct and each one must itself be moved, otherwise
        // it is also the image of itself
        let mut preimage = AHashMap::with_capacity(non_trivial.len());
        for (&point, &image) in &non_trivial {
            if !non_trivial.contains_key(&image) {
                return Err(PermutationError::NotABijection { point, image });
            }
            if let Some(first) = preimage.insert(image, point) {
                return Err(PermutationError::RepeatedImage {
                    image,
                    first,
                    second: point,
                });
            }
        }
        Ok(SparsePermutation { size, non_trivial })
    }

    /// Uniformly random permutation of `0..n`, see [`DensePermutation::random`].
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        SparsePermutation::from(&DensePermutation::random(n, rng))
    }

    /// Moved points with their images, by increasing point.
    pub fn non_trivial_images(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.non_trivial.iter().map(|(&point, &image)| (point, image))
    }

    /// Number of moved points.
    pub fn support_len(&self) -> usize {
        self.non_trivial.len()
    }

    fn padded_image(&self, point: usize) -> usize {
        self.non_trivial.get(&point).copied().unwrap_or(point)
    }

    pub fn inverse(&self) -> Self {
        SparsePermutation {
            size: self.size,
            non_trivial: self
                .non_trivial
                .iter()
                .map(|(&point, &image)| (image, point))
                .collect(),
        }
    }

    /// `self ∘ other`: apply `other`, then `self`.
    ///
    /// Sizes are reconciled as in [`DensePermutation::compose`]. Only points
    /// moved by one of the operands are visited.
    ///
    /// ```
    /// # use permcycles::permutation::{Permutation, SparsePermutation};
    /// let a = SparsePermutation::from_pairs(3, [(0, 1), (1, 0)]).unwrap();
    /// let b = SparsePermutation::from_pairs(5, [(3, 4), (4, 3)]).unwrap();
    /// let ab = a.compose(&b);
    /// assert_eq!(ab.size(), 5);
    /// assert_eq!(ab.images(), vec![1, 0, 2, 4, 3]);
    /// ```
    pub fn compose(&self, other: &Self) -> Self {
        let size = self.size.max(other.size);
        if self.size != other.size {
            trace!(
                "composing sizes {} and {}, padding to {size}",
                self.size,
                other.size
            );
        }
        let non_trivial = self
            .non_trivial
            .keys()
            .merge(other.non_trivial.keys())
            .dedup()
            .filter_map(|&point| {
                let image = self.padded_image(other.padded_image(point));
                (image != point).then_some((point, image))
            })
            .collect();
        SparsePermutation { size, non_trivial }
    }

    /// `self` composed with itself `k` times; `pow(0)` is the identity.
    pub fn pow(&self, k: u128) -> Self {
        let mut result = SparsePermutation::identity(self.size);
        let mut base = self.clone();
        let mut exp = k;
        while exp > 0 {
            if exp % 2 == 1 {
                result = result.compose(&base);
            }
            base = base.compose(&base);
            exp /= 2;
        }
        result
    }
}

impl Permutation for SparsePermutation {
    fn size(&self) -> usize {
        self.size
    }

    fn image(&self, point: usize) -> usize {
        assert!(
            point < self.size,
            "point {point} is outside the domain 0..{}",
            self.size
        );
        self.padded_image(point)
    }

    fn cycles(&self) -> Vec<Cycle> {
        let visited: AHashSet<usize> = AHashSet::with_capacity(self.non_trivial.len());
        decompose(self.non_trivial.keys().copied(), visited, |p| {
            self.padded_image(p)
        })
    }

    fn fixed_points(&self) -> Vec<usize> {
        (0..self.size)
            .filter(|point| !self.non_trivial.contains_key(point))
            .collect()
    }

    fn is_derangement(&self) -> bool {
        self.non_trivial.len() == self.size
    }

    fn is_identity(&self) -> bool {
        self.non_trivial.is_empty()
    }
}

impl Mul for &SparsePermutation {
    type Output = SparsePermutation;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl Mul for SparsePermutation {
    type Output = SparsePermutation;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}

impl From<&DensePermutation> for SparsePermutation {
    fn from(dense: &DensePermutation) -> Self {
        SparsePermutation {
            size: dense.size(),
            non_trivial: dense
                .as_slice()
                .iter()
                .enumerate()
                .filter(|&(point, &image)| point != image)
                .map(|(point, &image)| (point, image))
                .collect(),
        }
    }
}

impl PartialEq<DensePermutation> for SparsePermutation {
    fn eq(&self, other: &DensePermutation) -> bool {
        other == self
    }
}

/// Serialized form: the domain size and the moved points.
#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct SparseRepr {
    size: usize,
    images: BTreeMap<usize, usize>,
}

#[cfg(feature = "serde")]
impl TryFrom<SparseRepr> for SparsePermutation {
    type Error = PermutationError;

    fn try_from(repr: SparseRepr) -> Result<Self, Self::Error> {
        SparsePermutation::from_pairs(repr.size, repr.images)
    }
}

#[cfg(feature = "serde")]
impl From<SparsePermutation> for SparseRepr {
    fn from(p: SparsePermutation) -> Self {
        SparseRepr {
            size: p.size,
            images: p.non_trivial,
        }
    }
}
