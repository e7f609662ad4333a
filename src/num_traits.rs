//! # Number-theoretic helpers
//!
//! This module provides the greatest common divisor and least common multiple
//! used when folding cycle lengths into the order of a permutation.
//!
//! ## Traits:
//!
//! - **`GcdLcm`**:
//!   Provides `gcd`, `lcm` and `checked_lcm` for every unsigned primitive
//!   (`u8` through `u128` and `usize`). `gcd` is the iterative Euclidean
//!   algorithm. `lcm` divides by the gcd before multiplying, so intermediate
//!   values never exceed the result. `checked_lcm` returns `None` instead of
//!   overflowing, which is what the order computation relies on: orders grow
//!   like Landau's function and leave `u64` for domains of a few hundred points.
//!
//! By convention `gcd(0, 0) = 0` and `lcm(a, 0) = lcm(0, a) = 0`.

use duplicate::duplicate;

pub trait GcdLcm: Sized {
    /// Greatest common divisor.
    ///
    /// ```
    /// # use permcycles::num_traits::GcdLcm;
    /// assert_eq!(12u64.gcd(18), 6);
    /// assert_eq!(7u64.gcd(0), 7);
    /// ```
    fn gcd(self, other: Self) -> Self;

    /// Least common multiple. Overflow follows the primitive's arithmetic
    /// (a panic in debug builds); use [`GcdLcm::checked_lcm`] when the result
    /// may not fit.
    ///
    /// ```
    /// # use permcycles::num_traits::GcdLcm;
    /// assert_eq!(4u32.lcm(6), 12);
    /// ```
    fn lcm(self, other: Self) -> Self;

    /// Least common multiple, or `None` if it does not fit the type.
    ///
    /// ```
    /// # use permcycles::num_traits::GcdLcm;
    /// assert_eq!(200u8.checked_lcm(3), None);
    /// assert_eq!(20u8.checked_lcm(3), Some(60));
    /// ```
    fn checked_lcm(self, other: Self) -> Option<Self>;
}

duplicate! {
    [int_type;
        [u8];
        [u16];
        [u32];
        [u64];
        [u128];
        [usize];
        ]

    impl GcdLcm for int_type {
        fn gcd(self, other: Self) -> Self {
            let (mut a, mut b) = (self, other);
            while b != 0 {
                let r = a % b;
                a = b;
                b = r;
            }
            a
        }

        fn lcm(self, other: Self) -> Self {
            if self == 0 || other == 0 {
                return 0;
            }
            self / self.gcd(other) * other
        }

        fn checked_lcm(self, other: Self) -> Option<Self> {
            if self == 0 || other == 0 {
                return Some(0);
            }
            (self / self.gcd(other)).checked_mul(other)
        }
    }
}
