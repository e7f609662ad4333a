//! # Permcycles
//!
//! Permcycles is a Rust library for finite permutations: bijections on
//! `0..n`. It provides a dense representation (every image stored) and a
//! sparse one (only moved points stored), with inversion, composition across
//! mismatched domain sizes, cycle decomposition and order computation.
//!
//! Both representations, as well as single cycles, implement the
//! [`permutation::Permutation`] trait, so code that inspects permutations can
//! be written once for all of them.
//!
//! It manipulates individual permutations and their cyclic structure; it is
//! not a permutation-group library.

pub mod num_traits;
pub mod permutation;
