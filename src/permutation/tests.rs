use ahash::AHashSet;
use itertools::Itertools;
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

use super::*;

fn dense(images: &[usize]) -> DensePermutation {
    DensePermutation::from_images(images.to_vec()).unwrap()
}

fn sparse(images: &[usize]) -> SparsePermutation {
    SparsePermutation::from_images(images.to_vec()).unwrap()
}

fn cycle_elements(p: &impl Permutation) -> Vec<Vec<usize>> {
    p.cycles().into_iter().map(Cycle::into_elements).collect()
}

/// Consecutive blocks of the given lengths, each rotated by one.
fn blocks(lengths: &[usize]) -> DensePermutation {
    let mut images = Vec::new();
    let mut start = 0;
    for &len in lengths {
        images.extend((start + 1..start + len).chain([start]));
        start += len;
    }
    dense(&images)
}

fn primes_up_to(n: usize) -> Vec<usize> {
    (2..=n)
        .filter(|&k| (2..k).take_while(|d| d * d <= k).all(|d| k % d != 0))
        .collect()
}

#[test]
fn three_cycle_with_fixed_point() {
    let p = dense(&[1, 2, 0, 3]);
    assert_eq!(cycle_elements(&p), vec![vec![0, 1, 2]]);
    assert_eq!(p.fixed_points(), vec![3]);
    assert_eq!(p.order(), 3);
    assert_eq!(p.inverse().as_slice(), &[2, 0, 1, 3]);
    assert_eq!(p.compose(&p.inverse()).as_slice(), &[0, 1, 2, 3]);

    let s = sparse(&[1, 2, 0, 3]);
    assert_eq!(cycle_elements(&s), vec![vec![0, 1, 2]]);
    assert_eq!(s.fixed_points(), vec![3]);
    assert_eq!(s.order(), 3);
    assert_eq!(s.inverse().images(), vec![2, 0, 1, 3]);
    assert_eq!(s.compose(&s.inverse()).images(), vec![0, 1, 2, 3]);
    assert!(!s.is_derangement());
}

#[test]
fn double_transposition_is_derangement() {
    let s = sparse(&[1, 0, 3, 2]);
    assert!(s.is_derangement());
    assert!(s.fixed_points().is_empty());
    similar_asserts::assert_eq!(cycle_elements(&s), vec![vec![0, 1], vec![2, 3]]);
    assert_eq!(s.order(), 2);

    let d = dense(&[1, 0, 3, 2]);
    assert!(d.is_derangement());
    assert_eq!(d.cycles(), s.cycles());
}

#[test]
fn composition_pads_smaller_operand() {
    let small = dense(&[1, 0, 2]);
    let large = dense(&[0, 1, 2, 4, 3]);

    let ab = small.compose(&large);
    assert_eq!(ab.size(), 5);
    assert_eq!(ab.as_slice(), &[1, 0, 2, 4, 3]);
    assert_eq!(large.compose(&small).as_slice(), &[1, 0, 2, 4, 3]);

    let ab = sparse(&[1, 0, 2]).compose(&sparse(&[0, 1, 2, 4, 3]));
    assert_eq!(ab.size(), 5);
    assert_eq!(ab, &small * &large);
}

#[test]
fn composition_applies_right_operand_first() {
    let a = dense(&[1, 2, 0]);
    let b = dense(&[0, 2, 1]);
    // b: 1 -> 2, then a: 2 -> 0
    assert_eq!(a.compose(&b).image(1), 0);
    assert_eq!(a.compose(&b).as_slice(), &[1, 0, 2]);
    assert_eq!(b.compose(&a).as_slice(), &[2, 1, 0]);

    let sa = SparsePermutation::from(&a);
    let sb = SparsePermutation::from(&b);
    assert_eq!(&sa * &sb, a.compose(&b));
    assert_eq!(sb * sa, b * a);
}

#[test]
fn sparse_composition_with_larger_left_operand() {
    let a = SparsePermutation::from_pairs(10, [(8, 9), (9, 8)]).unwrap();
    let b = SparsePermutation::from_pairs(3, [(0, 2), (2, 0)]).unwrap();
    let ab = a.compose(&b);
    assert_eq!(ab.size(), 10);
    assert_eq!(ab.support_len(), 4);
    assert_eq!(cycle_elements(&ab), vec![vec![0, 2], vec![8, 9]]);
}

#[test]
fn malformed_images_are_rejected() {
    assert_eq!(
        DensePermutation::from_images(vec![0, 3, 1]),
        Err(PermutationError::ImageOutOfRange {
            point: 1,
            image: 3,
            size: 3
        })
    );
    assert_eq!(
        DensePermutation::from_images(vec![2, 1, 2]),
        Err(PermutationError::RepeatedImage {
            image: 2,
            first: 0,
            second: 2
        })
    );
    assert_eq!(
        SparsePermutation::from_images(vec![1, 1]),
        Err(PermutationError::RepeatedImage {
            image: 1,
            first: 0,
            second: 1
        })
    );
    assert!(DensePermutation::try_from(vec![1, 0]).is_ok());
}

#[test]
fn malformed_pairs_are_rejected() {
    assert_eq!(
        SparsePermutation::from_pairs(3, [(3, 0)]),
        Err(PermutationError::PointOutOfRange { point: 3, size: 3 })
    );
    assert_eq!(
        SparsePermutation::from_pairs(3, [(0, 1), (0, 1)]),
        Err(PermutationError::RepeatedPoint { point: 0 })
    );
    // 2 -> 1 while 1 is left fixed
    assert_eq!(
        SparsePermutation::from_pairs(3, [(0, 2), (2, 1)]),
        Err(PermutationError::NotABijection { point: 2, image: 1 })
    );
    assert_eq!(
        SparsePermutation::from_pairs(3, [(0, 1), (1, 1), (2, 0)]),
        Err(PermutationError::NotABijection { point: 0, image: 1 })
    );
    assert_eq!(
        SparsePermutation::from_pairs(3, [(0, 1), (1, 2), (2, 1)]),
        Err(PermutationError::RepeatedImage {
            image: 1,
            first: 0,
            second: 2
        })
    );

    let p = SparsePermutation::from_pairs(4, [(2, 2), (0, 1), (1, 0)]).unwrap();
    assert_eq!(p.support_len(), 2);
    assert_eq!(p.images(), vec![1, 0, 2, 3]);
}

#[test]
fn lookup_outside_domain() {
    let d = dense(&[1, 0]);
    let s = sparse(&[1, 0]);
    assert_eq!(d.try_image(1), Ok(0));
    assert_eq!(
        d.try_image(2),
        Err(PermutationError::PointOutOfRange { point: 2, size: 2 })
    );
    assert_eq!(
        s.try_image(7),
        Err(PermutationError::PointOutOfRange { point: 7, size: 2 })
    );
    assert_eq!(d[1], 0);
}

#[test]
#[should_panic(expected = "outside the domain")]
fn sparse_image_panics_outside_domain() {
    SparsePermutation::identity(3).image(3);
}

#[test]
#[should_panic]
fn dense_image_panics_outside_domain() {
    DensePermutation::identity(3).image(3);
}

#[test]
fn identity_and_empty() {
    for n in [0, 1, 6] {
        let d = DensePermutation::identity(n);
        let s = SparsePermutation::identity(n);
        assert!(d.is_identity());
        assert!(s.is_identity());
        assert!(d.cycles().is_empty());
        assert!(s.cycles().is_empty());
        assert_eq!(d.order(), 1);
        assert_eq!(s.order(), 1);
        assert_eq!(d.fixed_points(), (0..n).collect_vec());
        assert_eq!(s.fixed_points(), (0..n).collect_vec());
        assert_eq!(d, s);
    }
    // vacuously a derangement
    assert!(SparsePermutation::identity(0).is_derangement());
}

#[test]
fn order_is_lcm_of_cycle_lengths() {
    let p = blocks(&[2, 3, 4, 1, 5]);
    assert_eq!(p.cycle_type(), vec![2, 3, 4, 5]);
    assert_eq!(p.order(), 60);
    assert!(p.pow(60).is_identity());
    assert!(!p.pow(30).is_identity());
    assert_eq!(SparsePermutation::from(&p).order(), 60);
}

#[test]
fn order_reaches_beyond_u64() {
    let primes = primes_up_to(97);
    let expected: u128 = primes.iter().map(|&p| p as u128).product();
    assert!(expected > u64::MAX as u128);

    let p = blocks(&primes);
    assert_eq!(p.try_order(), Ok(expected));
    assert_eq!(SparsePermutation::from(&p).try_order(), Ok(expected));
}

#[test]
fn order_overflow_is_reported() {
    let p = blocks(&primes_up_to(103));
    assert_eq!(p.try_order(), Err(PermutationError::OrderOverflow));
}

#[test]
#[should_panic(expected = "order does not fit")]
fn order_overflow_panics() {
    blocks(&primes_up_to(103)).order();
}

#[test]
fn sign_follows_cycle_type() {
    assert_eq!(dense(&[1, 0, 2]).sign(), -1);
    assert_eq!(dense(&[1, 2, 0]).sign(), 1);
    assert_eq!(sparse(&[1, 0, 3, 2]).sign(), 1);
    assert_eq!(DensePermutation::identity(4).sign(), 1);
}

#[test]
fn cycles_sort_canonically() {
    let p = dense(&[4, 2, 1, 3, 5, 0, 7, 8, 6]);
    let mut cycles = p.cycles();
    similar_asserts::assert_eq!(
        cycles.iter().map(Cycle::elements).collect_vec(),
        vec![&[0, 4, 5][..], &[1, 2][..], &[6, 7, 8][..]]
    );
    cycles.sort();
    assert_eq!(
        cycles.iter().map(Cycle::elements).collect_vec(),
        vec![&[1, 2][..], &[0, 4, 5][..], &[6, 7, 8][..]]
    );
}

#[test]
fn random_is_reproducible_and_valid() {
    let a = DensePermutation::random(50, &mut SmallRng::seed_from_u64(3));
    let b = DensePermutation::random(50, &mut SmallRng::seed_from_u64(3));
    assert_eq!(a, b);
    assert!(DensePermutation::from_images(a.images()).is_ok());
    assert_eq!(DensePermutation::random(0, &mut SmallRng::seed_from_u64(3)).size(), 0);
    assert_eq!(DensePermutation::random(1, &mut SmallRng::seed_from_u64(3)).size(), 1);

    let s = SparsePermutation::random(50, &mut SmallRng::seed_from_u64(3));
    assert_eq!(s, a);
}

#[test]
fn random_reaches_every_permutation_of_three() {
    let mut rng = SmallRng::seed_from_u64(11);
    let seen: AHashSet<Vec<usize>> = (0..600)
        .map(|_| DensePermutation::random(3, &mut rng).into())
        .collect();
    assert_eq!(seen.len(), 6);
}

#[test]
fn permutations_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DensePermutation>();
    assert_send_sync::<SparsePermutation>();
    assert_send_sync::<Cycle>();

    let p = std::sync::Arc::new(blocks(&[3, 4]));
    let handles = (0..4)
        .map(|_| {
            let p = p.clone();
            std::thread::spawn(move || p.order())
        })
        .collect_vec();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 12);
    }
}

#[cfg(feature = "serde")]
#[test]
fn serde_goes_through_validation() {
    let p = dense(&[2, 0, 1]);
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, "[2,0,1]");
    assert_eq!(serde_json::from_str::<DensePermutation>(&json).unwrap(), p);
    assert!(serde_json::from_str::<DensePermutation>("[0,0,1]").is_err());

    let s = SparsePermutation::from(&p);
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(serde_json::from_str::<SparsePermutation>(&json).unwrap(), s);
    assert!(serde_json::from_str::<SparsePermutation>(r#"{"size":2,"images":{"0":1}}"#).is_err());

    assert!(serde_json::from_str::<Cycle>("[]").is_err());
}

fn images_strategy(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    (0..=max_len).prop_flat_map(|n| Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
}

fn dense_strategy() -> impl Strategy<Value = DensePermutation> {
    images_strategy(40).prop_map(|images| DensePermutation::from_images(images).unwrap())
}

proptest! {
    #[test]
    fn inverse_cancels(p in dense_strategy()) {
        let id = DensePermutation::identity(p.size());
        prop_assert_eq!(p.compose(&p.inverse()), id.clone());
        prop_assert_eq!(p.inverse().compose(&p), id);
        prop_assert_eq!(p.inverse().inverse(), p.clone());

        let s = SparsePermutation::from(&p);
        prop_assert!(s.compose(&s.inverse()).is_identity());
        prop_assert_eq!(s.inverse().inverse(), s);
    }

    #[test]
    fn cycles_and_fixed_points_partition_domain(p in dense_strategy()) {
        for perm in [&p as &dyn Permutation, &SparsePermutation::from(&p)] {
            let mut points = perm.fixed_points();
            for cycle in perm.cycles() {
                prop_assert!(cycle.len() >= 2);
                prop_assert_eq!(cycle.elements().iter().min(), Some(&cycle.elements()[0]));
                for &x in cycle.elements() {
                    prop_assert_eq!(perm.image(x), cycle.image(x));
                }
                points.extend_from_slice(cycle.elements());
            }
            points.sort_unstable();
            prop_assert_eq!(points, (0..p.size()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn order_is_smallest_identity_power(p in images_strategy(9).prop_map(|i| DensePermutation::from_images(i).unwrap())) {
        let order = p.order();
        let mut power = p.clone();
        let mut k = 1u128;
        while !power.is_identity() {
            power = p.compose(&power);
            k += 1;
        }
        prop_assert_eq!(k, order);
        prop_assert!(p.pow(order).is_identity());
    }

    #[test]
    fn dense_and_sparse_agree(a in dense_strategy(), b in dense_strategy()) {
        let sa = SparsePermutation::from(&a);
        let sb = SparsePermutation::from(&b);

        prop_assert_eq!(a.order(), sa.order());
        let dense_cycles: AHashSet<Cycle> = a.cycles().into_iter().collect();
        let sparse_cycles: AHashSet<Cycle> = sa.cycles().into_iter().collect();
        prop_assert_eq!(dense_cycles, sparse_cycles);
        prop_assert_eq!(a.fixed_points(), sa.fixed_points());
        prop_assert_eq!(a.is_derangement(), sa.is_derangement());
        prop_assert_eq!(a.sign(), sa.sign());

        let dense_ab = a.compose(&b);
        let sparse_ab = sa.compose(&sb);
        prop_assert_eq!(&dense_ab, &sparse_ab);
        prop_assert_eq!(DensePermutation::from(&sparse_ab), dense_ab);
        prop_assert_eq!(sa.inverse(), a.inverse());
    }

    #[test]
    fn composition_is_associative(a in dense_strategy(), b in dense_strategy(), c in dense_strategy()) {
        prop_assert_eq!(a.compose(&b).compose(&c), a.compose(&b.compose(&c)));
    }

    #[test]
    fn cycle_inverses_match_permutation_inverse(p in dense_strategy()) {
        let inv = p.inverse();
        let mut expected = inv.cycles();
        let mut reversed = p.cycles().iter().map(Cycle::inverse).collect_vec();
        // compare orbits, not rotations
        for cycles in [&mut expected, &mut reversed] {
            for c in cycles.iter_mut() {
                let mut elem = c.clone().into_elements();
                let start = elem.iter().position_min().unwrap_or(0);
                elem.rotate_left(start);
                *c = Cycle::new(elem).unwrap();
            }
            cycles.sort();
        }
        prop_assert_eq!(expected, reversed);
    }
}
