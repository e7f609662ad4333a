use std::cmp::Ordering;

use ahash::AHashSet;
use bitvec::vec::BitVec;

use super::{Permutation, PermutationError};

/// A single orbit `(a b c ...)`: `a -> b -> c -> ... -> a`.
///
/// Elements are distinct and there is at least one of them. Cycles produced
/// by [`Permutation::cycles`] have length at least 2 and start at their
/// smallest element.
///
/// # Examples
///
/// ```
/// use permcycles::permutation::{Cycle, Permutation};
///
/// let c = Cycle::new(vec![0, 3, 1]).unwrap();
/// assert_eq!(c.image(0), 3);
/// assert_eq!(c.image(1), 0);
/// assert_eq!(c.image(2), 2);
/// assert_eq!(c.order(), 3);
/// assert_eq!(c.inverse().elements(), &[1, 3, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct Cycle {
    elem: Vec<usize>,
}

impl Cycle {
    /// Builds a cycle from its elements in traversal order.
    ///
    /// Fails on an empty sequence or a repeated element.
    pub fn new(elem: Vec<usize>) -> Result<Self, PermutationError> {
        if elem.is_empty() {
            return Err(PermutationError::EmptyCycle);
        }
        let mut seen = AHashSet::with_capacity(elem.len());
        for &point in &elem {
            if !seen.insert(point) {
                return Err(PermutationError::RepeatedPoint { point });
            }
        }
        Ok(Cycle { elem })
    }

    pub fn elements(&self) -> &[usize] {
        &self.elem
    }

    pub fn into_elements(self) -> Vec<usize> {
        self.elem
    }

    pub fn len(&self) -> usize {
        self.elem.len()
    }

    /// Always `false` for a constructed cycle.
    pub fn is_empty(&self) -> bool {
        self.elem.is_empty()
    }

    pub fn contains(&self, point: usize) -> bool {
        self.elem.contains(&point)
    }

    /// The same orbit traversed backwards.
    pub fn inverse(&self) -> Self {
        let mut elem = self.elem.clone();
        elem.reverse();
        Cycle { elem }
    }
}

impl Permutation for Cycle {
    /// Smallest domain containing every element: the largest element plus one.
    fn size(&self) -> usize {
        self.elem.iter().max().map_or(0, |&max| max + 1)
    }

    fn image(&self, point: usize) -> usize {
        match self.elem.iter().position(|&e| e == point) {
            Some(pos) => self.elem[(pos + 1) % self.elem.len()],
            None => point,
        }
    }

    fn cycles(&self) -> Vec<Cycle> {
        if self.elem.len() > 1 {
            vec![self.clone()]
        } else {
            Vec::new()
        }
    }

    fn try_order(&self) -> Result<u128, PermutationError> {
        Ok(self.elem.len() as u128)
    }
}

/// Shorter cycles come first; equal lengths compare element by element.
///
/// The comparison looks at the stored rotation, so `(1 2 0)` and `(0 1 2)`
/// are different and ordered. Cycles from [`Permutation::cycles`] always
/// start at their smallest element.
impl Ord for Cycle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.elem
            .len()
            .cmp(&other.elem.len())
            .then_with(|| self.elem.cmp(&other.elem))
    }
}

impl PartialOrd for Cycle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<Vec<usize>> for Cycle {
    type Error = PermutationError;

    fn try_from(elem: Vec<usize>) -> Result<Self, Self::Error> {
        Cycle::new(elem)
    }
}

impl From<Cycle> for Vec<usize> {
    fn from(cycle: Cycle) -> Self {
        cycle.elem
    }
}

/// Record of the points already placed in a cycle (or discarded as fixed).
pub(crate) trait Visited {
    /// Marks `point`, returning `true` if it was not marked before.
    fn visit(&mut self, point: usize) -> bool;
}

impl Visited for BitVec {
    fn visit(&mut self, point: usize) -> bool {
        !self.replace(point, true)
    }
}

impl Visited for AHashSet<usize> {
    fn visit(&mut self, point: usize) -> bool {
        self.insert(point)
    }
}

/// Cycle decomposition shared by every representation.
///
/// `candidates` must be ascending and contain every point that `image` moves.
/// Each candidate not yet visited starts a walk along `image` until it comes
/// back; fixed candidates are dropped. Every point is visited once.
pub(crate) fn decompose<I, V, F>(candidates: I, mut visited: V, image: F) -> Vec<Cycle>
where
    I: IntoIterator<Item = usize>,
    V: Visited,
    F: Fn(usize) -> usize,
{
    let mut cycles = Vec::new();
    for start in candidates {
        if !visited.visit(start) {
            continue;
        }
        let mut next = image(start);
        if next == start {
            continue;
        }
        let mut elem = vec![start];
        while next != start {
            visited.visit(next);
            elem.push(next);
            next = image(next);
        }
        cycles.push(Cycle { elem });
    }
    cycles
}
