use std::ops::{Index, Mul};

use bitvec::vec::BitVec;
use log::{debug, trace};
use rand::Rng;

use super::{
    cycle::{decompose, Cycle},
    Permutation, PermutationError, SparsePermutation,
};

/// A permutation of `0..n` storing the image of every point.
///
/// # Examples
///
/// ```
/// use permcycles::permutation::{DensePermutation, Permutation};
///
/// // 0 -> 1, 1 -> 2, 2 -> 0, 3 -> 3
/// let p = DensePermutation::from_images(vec![1, 2, 0, 3]).unwrap();
/// assert_eq!(p.inverse().as_slice(), &[2, 0, 1, 3]);
/// assert!(p.compose(&p.inverse()).is_identity());
/// assert_eq!(p.order(), 3);
/// assert_eq!(p.fixed_points(), vec![3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct DensePermutation {
    images: Vec<usize>,
}

/// Checks that `images` is a bijection on `0..images.len()`.
pub(crate) fn validate_images(images: &[usize]) -> Result<(), PermutationError> {
    let size = images.len();
    // preimage[j] = Some(i) once i -> j has been seen
    let mut preimage: Vec<Option<usize>> = vec![None; size];
    for (point, &image) in images.iter().enumerate() {
        let slot = preimage
            .get_mut(image)
            .ok_or(PermutationError::ImageOutOfRange { point, image, size })?;
        if let Some(first) = slot.replace(point) {
            return Err(PermutationError::RepeatedImage {
                image,
                first,
                second: point,
            });
        }
    }
    Ok(())
}

impl DensePermutation {
    /// The identity on `0..n`.
    ///
    /// ```
    /// # use permcycles::permutation::{DensePermutation, Permutation};
    /// let p = DensePermutation::identity(4);
    /// assert_eq!(p.as_slice(), &[0, 1, 2, 3]);
    /// assert_eq!(p.order(), 1);
    /// ```
    pub fn identity(n: usize) -> Self {
        DensePermutation {
            images: (0..n).collect(),
        }
    }

    /// Builds a permutation from its one-line notation: `images[i]` is the image of `i`.
    ///
    /// Fails if an image is out of range or repeated.
    ///
    /// ```
    /// # use permcycles::permutation::{DensePermutation, PermutationError};
    /// assert!(DensePermutation::from_images(vec![2, 0, 1]).is_ok());
    /// assert_eq!(
    ///     DensePermutation::from_images(vec![0, 0, 1]),
    ///     Err(PermutationError::RepeatedImage { image: 0, first: 0, second: 1 })
    /// );
    /// ```
    pub fn from_images(images: Vec<usize>) -> Result<Self, PermutationError> {
        if let Err(err) = validate_images(&images) {
            debug!("rejected image sequence of length {}: {err}", images.len());
            return Err(err);
        }
        Ok(DensePermutation { images })
    }

    /// Uniformly random permutation of `0..n`, shuffled in place from the
    /// identity with `rng` (Fisher-Yates).
    ///
    /// ```
    /// # use permcycles::permutation::{DensePermutation, Permutation};
    /// use rand::{rngs::SmallRng, SeedableRng};
    ///
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let p = DensePermutation::random(10, &mut rng);
    /// assert_eq!(p.size(), 10);
    /// assert!(p.compose(&p.inverse()).is_identity());
    /// ```
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut images: Vec<usize> = (0..n).collect();
        for i in 0..n.saturating_sub(1) {
            let j = rng.gen_range(i..n);
            images.swap(i, j);
        }
        DensePermutation { images }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.images
    }

    /// Image of `point`, extended by the identity beyond the domain.
    fn padded_image(&self, point: usize) -> usize {
        self.images.get(point).copied().unwrap_or(point)
    }

    /// The inverse permutation: `inverse[images[i]] = i`.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.images.len()];
        for (i, &j) in self.images.iter().enumerate() {
            inv[j] = i;
        }
        DensePermutation { images: inv }
    }

    /// `self ∘ other`: apply `other`, then `self`.
    ///
    /// If the sizes differ, the smaller operand acts as the identity on the
    /// points it lacks and the result has the larger size.
    ///
    /// ```
    /// # use permcycles::permutation::{DensePermutation, Permutation};
    /// let swap01 = DensePermutation::from_images(vec![1, 0, 2]).unwrap();
    /// let swap34 = DensePermutation::from_images(vec![0, 1, 2, 4, 3]).unwrap();
    /// assert_eq!(swap01.compose(&swap34).as_slice(), &[1, 0, 2, 4, 3]);
    /// ```
    pub fn compose(&self, other: &Self) -> Self {
        let size = self.size().max(other.size());
        if self.size() != other.size() {
            trace!(
                "composing sizes {} and {}, padding to {size}",
                self.size(),
                other.size()
            );
        }
        let images = (0..size)
            .map(|i| self.padded_image(other.padded_image(i)))
            .collect();
        DensePermutation { images }
    }

    /// `self` composed with itself `k` times; `pow(0)` is the identity.
    ///
    /// ```
    /// # use permcycles::permutation::{DensePermutation, Permutation};
    /// let p = DensePermutation::from_images(vec![1, 2, 0]).unwrap();
    /// assert_eq!(p.pow(2).as_slice(), &[2, 0, 1]);
    /// assert!(p.pow(p.order()).is_identity());
    /// ```
    pub fn pow(&self, k: u128) -> Self {
        let mut result = DensePermutation::identity(self.size());
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

impl Permutation for DensePermutation {
    fn size(&self) -> usize {
        self.images.len()
    }

    fn image(&self, point: usize) -> usize {
        self.images[point]
    }

    fn cycles(&self) -> Vec<Cycle> {
        let visited: BitVec = BitVec::repeat(false, self.images.len());
        decompose(0..self.images.len(), visited, |p| self.images[p])
    }

    fn images(&self) -> Vec<usize> {
        self.images.clone()
    }
}

impl Index<usize> for DensePermutation {
    type Output = usize;

    fn index(&self, index: usize) -> &Self::Output {
        &self.images[index]
    }
}

impl Mul for &DensePermutation {
    type Output = DensePermutation;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl Mul for DensePermutation {
    type Output = DensePermutation;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs)
    }
}

impl TryFrom<Vec<usize>> for DensePermutation {
    type Error = PermutationError;

    fn try_from(images: Vec<usize>) -> Result<Self, Self::Error> {
        DensePermutation::from_images(images)
    }
}

impl From<DensePermutation> for Vec<usize> {
    fn from(p: DensePermutation) -> Self {
        p.images
    }
}

impl From<&SparsePermutation> for DensePermutation {
    fn from(sparse: &SparsePermutation) -> Self {
        let mut images: Vec<usize> = (0..sparse.size()).collect();
        for (point, image) in sparse.non_trivial_images() {
            images[point] = image;
        }
        DensePermutation { images }
    }
}

impl PartialEq<SparsePermutation> for DensePermutation {
    fn eq(&self, other: &SparsePermutation) -> bool {
        self.size() == other.size()
            && self
                .images
                .iter()
                .enumerate()
                .all(|(point, &image)| other.image(point) == image)
    }
}
