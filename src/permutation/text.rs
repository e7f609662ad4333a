//! Text form of permutations.
//!
//! - dense: `"4 : 1 2 0 3"`, the size then every image;
//! - sparse: `"4 : 0 1 1 2 2 0"`, the size then `point image` for every moved point;
//! - cycle: `"(0 1 2)"`.
//!
//! With the alternate flag (`{:#}`) both permutations print in cycle
//! notation, `"(0 1 2)(3 4)"`, or `"()"` for the identity.
//!
//! Parsing accepts any whitespace between tokens and the `:` after the size
//! may be omitted or attached to it (`"4: 1 2 0 3"`).

use std::{
    fmt,
    iter::Peekable,
    num::ParseIntError,
    str::{FromStr, SplitWhitespace},
};

use itertools::Itertools;
use log::debug;
use thiserror::Error;

use super::{Cycle, DensePermutation, Permutation, PermutationError, SparsePermutation};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePermutationError {
    #[error("missing domain size")]
    MissingSize,

    #[error("invalid integer: {0}")]
    InvalidInteger(#[from] ParseIntError),

    #[error("expected {expected} images, found {found}")]
    ImageCount { expected: usize, found: usize },

    #[error("point {point} has no image")]
    UnpairedPoint { point: usize },

    #[error("a cycle is written as \"(a b ...)\"")]
    CycleDelimiters,

    #[error(transparent)]
    Invalid(#[from] PermutationError),
}

fn write_cycle_notation(f: &mut fmt::Formatter<'_>, cycles: &[Cycle]) -> fmt::Result {
    if cycles.is_empty() {
        return write!(f, "()");
    }
    for cycle in cycles {
        write!(f, "{cycle}")?;
    }
    Ok(())
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.elements().iter().join(" "))
    }
}

impl fmt::Display for DensePermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return write_cycle_notation(f, &self.cycles());
        }
        write!(f, "{} :", self.size())?;
        for image in self.as_slice() {
            write!(f, " {image}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SparsePermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return write_cycle_notation(f, &self.cycles());
        }
        write!(f, "{} :", self.size())?;
        for (point, image) in self.non_trivial_images() {
            write!(f, " {point} {image}")?;
        }
        Ok(())
    }
}

/// Reads the domain size and the optional `:` that follows it.
fn parse_header(tokens: &mut Peekable<SplitWhitespace<'_>>) -> Result<usize, ParsePermutationError> {
    let first = tokens.next().ok_or(ParsePermutationError::MissingSize)?;
    let size = match first.strip_suffix(':') {
        Some(digits) => digits.parse::<usize>()?,
        None => {
            let size = first.parse::<usize>()?;
            tokens.next_if_eq(&":");
            size
        }
    };
    Ok(size)
}

fn parse_points<'a, I>(tokens: I) -> Result<Vec<usize>, ParsePermutationError>
where
    I: Iterator<Item = &'a str>,
{
    Ok(tokens.map(str::parse::<usize>).collect::<Result<Vec<_>, _>>()?)
}

impl FromStr for DensePermutation {
    type Err = ParsePermutationError;

    /// ```
    /// # use permcycles::permutation::DensePermutation;
    /// let p: DensePermutation = "4 : 1 2 0 3".parse().unwrap();
    /// assert_eq!(p.as_slice(), &[1, 2, 0, 3]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().peekable();
        let size = parse_header(&mut tokens)?;
        let images = parse_points(tokens)?;
        if images.len() != size {
            debug!("dense text declares {size} points but lists {}", images.len());
            return Err(ParsePermutationError::ImageCount {
                expected: size,
                found: images.len(),
            });
        }
        Ok(DensePermutation::from_images(images)?)
    }
}

impl FromStr for SparsePermutation {
    type Err = ParsePermutationError;

    /// ```
    /// # use permcycles::permutation::{Permutation, SparsePermutation};
    /// let p: SparsePermutation = "6 : 0 5 5 0".parse().unwrap();
    /// assert_eq!(p.images(), vec![5, 1, 2, 3, 4, 0]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace().peekable();
        let size = parse_header(&mut tokens)?;
        let points = parse_points(tokens)?;
        let mut chunks = points.chunks_exact(2);
        let pairs: Vec<(usize, usize)> = chunks.by_ref().map(|pair| (pair[0], pair[1])).collect();
        if let [point] = chunks.remainder() {
            return Err(ParsePermutationError::UnpairedPoint { point: *point });
        }
        Ok(SparsePermutation::from_pairs(size, pairs)?)
    }
}

impl FromStr for Cycle {
    type Err = ParsePermutationError;

    /// ```
    /// # use permcycles::permutation::Cycle;
    /// let c: Cycle = "(4 0 2)".parse().unwrap();
    /// assert_eq!(c.elements(), &[4, 0, 2]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(ParsePermutationError::CycleDelimiters)?;
        let elem = parse_points(inner.split_whitespace())?;
        Ok(Cycle::new(elem)?)
    }
}
