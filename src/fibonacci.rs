use std::iter::FusedIterator;
use std::mem;

use log::{debug, warn};
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::math::Matrix2;
use crate::memo::{CacheInfo, CachePolicy, Memoized};

/// Recursion depth at which [`fib_unbounded`] gives up.
pub const DEFAULT_RECURSION_LIMIT: usize = 1000;

/// Above this index [`fib_recursive`] logs a warning: the call count grows
/// as `2·F(n+1) - 1`.
pub const RECURSIVE_WARN_THRESHOLD: usize = 35;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FibonacciError {
    #[error("maximum recursion depth of {limit} exceeded (reached index {index})")]
    RecursionLimit { index: i64, limit: usize },
}

/// Fibonacci recursion without a base case.
///
/// Every call recurses on `n - 1` and `n - 2`, so the index walks into the
/// negatives and the computation never bottoms out. Instead of overflowing
/// the stack the recursion is cut off at [`DEFAULT_RECURSION_LIMIT`] and an
/// error is returned, for every input.
///
/// # Example
/// ```
/// use fibonacci_pi::fibonacci::{fib_unbounded, FibonacciError};
/// assert!(matches!(fib_unbounded(5), Err(FibonacciError::RecursionLimit { .. })));
/// ```
pub fn fib_unbounded(n: i64) -> Result<BigUint, FibonacciError> {
    fib_unbounded_with_limit(n, DEFAULT_RECURSION_LIMIT)
}

pub fn fib_unbounded_with_limit(n: i64, limit: usize) -> Result<BigUint, FibonacciError> {
    unbounded_at_depth(n, 0, limit)
}

fn unbounded_at_depth(n: i64, depth: usize, limit: usize) -> Result<BigUint, FibonacciError> {
    if depth >= limit {
        debug!("unbounded recursion hit depth {limit} at index {n}");
        return Err(FibonacciError::RecursionLimit { index: n, limit });
    }
    let a = unbounded_at_depth(n.wrapping_sub(1), depth + 1, limit)?;
    let b = unbounded_at_depth(n.wrapping_sub(2), depth + 1, limit)?;
    Ok(a + b)
}

/// Plain recursion with the base case `F(n) = n` for `n < 2`.
///
/// Correct but exponential: computing `F(n)` takes `2·F(n+1) - 1` calls.
///
/// # Example
/// ```
/// use fibonacci_pi::fibonacci::fib_recursive;
/// use num_bigint::BigUint;
/// assert_eq!(fib_recursive(20), BigUint::from(6765u32));
/// ```
pub fn fib_recursive(n: usize) -> BigUint {
    fib_recursive_counted(n).0
}

/// Same as [`fib_recursive`], also returning the number of invocations made.
pub fn fib_recursive_counted(n: usize) -> (BigUint, u64) {
    if n > RECURSIVE_WARN_THRESHOLD {
        warn!("fib_recursive({n}) runs in exponential time");
    }
    let mut calls = 0;
    let value = recursive_step(n, &mut calls);
    (value, calls)
}

fn recursive_step(n: usize, calls: &mut u64) -> BigUint {
    *calls += 1;
    if n < 2 {
        return BigUint::from(n);
    }
    recursive_step(n - 2, calls) + recursive_step(n - 1, calls)
}

/// Hand-rolled memoization: an explicit index → value table seeded with the
/// base cases `F(0)` and `F(1)`.
///
/// Missing entries are filled upwards from the highest cached index, so the
/// table always holds every index from `0` to its highest entry and the work
/// needs no stack depth proportional to `n`. The memo lives as long as the
/// value that owns it.
#[derive(Debug, Clone)]
pub struct FibonacciMemo {
    // memo[k] == F(k); never shorter than the two base cases
    memo: Vec<BigUint>,
}

impl FibonacciMemo {
    pub fn new() -> Self {
        FibonacciMemo {
            memo: vec![BigUint::zero(), BigUint::one()],
        }
    }

    pub fn fib(&mut self, n: usize) -> BigUint {
        if let Some(value) = self.memo.get(n) {
            return value.clone();
        }
        debug!("extending fibonacci memo from {} to {n}", self.memo.len() - 1);
        self.memo.reserve(n + 1 - self.memo.len());
        while self.memo.len() <= n {
            let len = self.memo.len();
            let next = &self.memo[len - 1] + &self.memo[len - 2];
            self.memo.push(next);
        }
        self.memo[n].clone()
    }

    pub fn get(&self, n: usize) -> Option<&BigUint> {
        self.memo.get(n)
    }

    pub fn contains(&self, n: usize) -> bool {
        n < self.memo.len()
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    // Never true: the base entries survive `clear`.
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    /// Entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BigUint)> {
        self.memo.iter().enumerate()
    }

    /// Forgets everything except the base cases.
    pub fn clear(&mut self) {
        self.memo.truncate(2);
    }
}

impl Default for FibonacciMemo {
    fn default() -> Self {
        Self::new()
    }
}

fn cached_body(cache: &mut Memoized<usize, BigUint>, n: usize) -> BigUint {
    if n < 2 {
        return BigUint::from(n);
    }
    cache.call(n - 2) + cache.call(n - 1)
}

/// The recursive definition of [`fib_recursive`] wrapped in a [`Memoized`]
/// cache, so overlapping subproblems are only computed once.
///
/// Before an uncached index is evaluated the cache is warmed in ascending
/// order, so each step recurses a single level onto cached neighbours and
/// the stack depth stays constant in `n`. An LRU capacity below 2 cannot hold
/// both neighbours and falls back to recomputation.
#[derive(Debug)]
pub struct CachedFibonacci {
    cache: Memoized<usize, BigUint>,
}

impl CachedFibonacci {
    pub fn new() -> Self {
        Self::with_policy(CachePolicy::Unbounded)
    }

    pub fn with_policy(policy: CachePolicy) -> Self {
        CachedFibonacci {
            cache: Memoized::new(cached_body, policy),
        }
    }

    pub fn fib(&mut self, n: usize) -> BigUint {
        if self.cache.peek(&n).is_none() {
            for k in 0..n {
                self.cache.call(k);
            }
        }
        self.cache.call(n)
    }

    pub fn cache_info(&self) -> CacheInfo {
        self.cache.cache_info()
    }

    pub fn cache_clear(&mut self) {
        self.cache.cache_clear();
    }
}

impl Default for CachedFibonacci {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes `F(n)` with a fresh unbounded [`CachedFibonacci`].
///
/// # Example
/// ```
/// use fibonacci_pi::fibonacci::fib_cached;
/// use num_bigint::BigUint;
/// assert_eq!(fib_cached(50), BigUint::from(12_586_269_025u64));
/// ```
pub fn fib_cached(n: usize) -> BigUint {
    CachedFibonacci::new().fib(n)
}

/// Iterative computation in O(n) time and O(1) extra space.
///
/// Keeps the last two terms and advances them `n - 1` times.
///
/// # Example
/// ```
/// use fibonacci_pi::fibonacci::fib_iterative;
/// use num_bigint::BigUint;
/// assert_eq!(fib_iterative(10), BigUint::from(55u32));
/// ```
pub fn fib_iterative(n: usize) -> BigUint {
    if n == 0 {
        return BigUint::zero();
    }
    let mut last = BigUint::zero();
    let mut next = BigUint::one();
    for _ in 1..n {
        let sum = &last + &next;
        last = mem::replace(&mut next, sum);
    }
    next
}

// F(n) via the n-th power of the Q-matrix, O(log n) multiplications
pub fn fib_matrix(n: usize) -> BigUint {
    Matrix2::fibonacci_q().pow(n).b
}

/// Lazily produced sequence `F(0), F(1), ..., F(n)`.
///
/// Created by [`fib_sequence`]. The iterator is consumed as it goes and is
/// not `Clone`; enumerate again by calling [`fib_sequence`] again.
#[derive(Debug)]
pub struct FibonacciSequence {
    last: BigUint,
    next: BigUint,
    produced: usize,
    len: usize,
}

impl Iterator for FibonacciSequence {
    type Item = BigUint;

    fn next(&mut self) -> Option<BigUint> {
        if self.produced >= self.len {
            return None;
        }
        let value = match self.produced {
            0 => BigUint::zero(),
            1 => BigUint::one(),
            _ => {
                let sum = &self.last + &self.next;
                self.last = mem::replace(&mut self.next, sum);
                self.next.clone()
            }
        };
        self.produced += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.produced;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FibonacciSequence {}

impl FusedIterator for FibonacciSequence {}

/// Produces the `n + 1` terms `F(0)..=F(n)` one at a time.
///
/// The length is a `usize`, so `fib_sequence(usize::MAX)` is capped at
/// `usize::MAX` terms and stops one short of `F(usize::MAX)`.
///
/// # Example
/// ```
/// use fibonacci_pi::fibonacci::fib_sequence;
/// use num_bigint::BigUint;
/// let terms: Vec<BigUint> = fib_sequence(6).collect();
/// assert_eq!(terms, [0u32, 1, 1, 2, 3, 5, 8].map(BigUint::from));
/// ```
pub fn fib_sequence(n: usize) -> FibonacciSequence {
    FibonacciSequence {
        last: BigUint::zero(),
        next: BigUint::one(),
        produced: 0,
        len: n.saturating_add(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn unbounded_recursion_always_fails() {
        for n in [-3, 0, 1, 5, 40] {
            assert_eq!(
                fib_unbounded(n),
                Err(FibonacciError::RecursionLimit {
                    index: n - DEFAULT_RECURSION_LIMIT as i64,
                    limit: DEFAULT_RECURSION_LIMIT,
                })
            );
        }
    }

    #[test]
    fn unbounded_recursion_respects_custom_limit() {
        let err = fib_unbounded_with_limit(5, 10).unwrap_err();
        assert_eq!(err, FibonacciError::RecursionLimit { index: -5, limit: 10 });
        assert_eq!(
            err.to_string(),
            "maximum recursion depth of 10 exceeded (reached index -5)"
        );
    }

    #[test]
    fn recursive_base_cases() {
        assert_eq!(fib_recursive(0), big(0));
        assert_eq!(fib_recursive(1), big(1));
        assert_eq!(fib_recursive(2), big(1));
    }

    #[test]
    fn recursive_call_count() {
        assert_eq!(fib_recursive_counted(20), (big(6765), 21891));
        assert_eq!(fib_recursive_counted(0).1, 1);
    }

    #[test]
    fn memo_is_seeded_with_base_cases() {
        let memo = FibonacciMemo::new();
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.get(0), Some(&big(0)));
        assert_eq!(memo.get(1), Some(&big(1)));
    }

    #[test]
    fn memo_holds_every_index_after_fib_50() {
        let mut memo = FibonacciMemo::new();
        assert_eq!(memo.fib(50), big(12_586_269_025));
        assert_eq!(memo.len(), 51);
        for k in 0..=50 {
            assert_eq!(memo.get(k), Some(&fib_iterative(k)), "index {k}");
        }
        assert!(!memo.contains(51));
    }

    #[test]
    fn memo_handles_indices_deeper_than_the_stack() {
        let mut memo = FibonacciMemo::new();
        assert_eq!(memo.fib(20_000), fib_matrix(20_000));
        assert_eq!(memo.len(), 20_001);

        // Extends from the highest cached entry.
        assert_eq!(memo.fib(20_010), fib_matrix(20_010));
        assert_eq!(memo.len(), 20_011);
    }

    #[test]
    fn memo_clear_keeps_base_cases() {
        let mut memo = FibonacciMemo::new();
        memo.fib(30);
        memo.clear();
        assert_eq!(memo.len(), 2);
        assert!(memo.contains(0) && memo.contains(1));
        assert_eq!(memo.fib(12), big(144));
    }

    #[test]
    fn cached_computes_each_index_once() {
        let mut cached = CachedFibonacci::new();
        assert_eq!(cached.fib(50), big(12_586_269_025));
        let info = cached.cache_info();
        assert_eq!(info.misses, 51);
        assert_eq!(info.current_size, 51);

        cached.fib(50);
        assert_eq!(cached.cache_info().hits, info.hits + 1);
        assert_eq!(cached.cache_info().misses, 51);
    }

    #[test]
    fn cached_handles_indices_deeper_than_the_stack() {
        let mut cached = CachedFibonacci::new();
        assert_eq!(cached.fib(20_000), fib_matrix(20_000));
        assert_eq!(cached.cache_info().misses, 20_001);

        let policy = CachePolicy::Lru {
            capacity: std::num::NonZeroUsize::new(2).unwrap(),
        };
        let mut bounded = CachedFibonacci::with_policy(policy);
        assert_eq!(bounded.fib(20_000), fib_matrix(20_000));
        assert!(bounded.cache_info().current_size <= 2);
    }

    #[test]
    fn cached_with_small_lru_is_still_correct() {
        let policy = CachePolicy::Lru {
            capacity: std::num::NonZeroUsize::new(3).unwrap(),
        };
        let mut cached = CachedFibonacci::with_policy(policy);
        assert_eq!(cached.fib(40), big(102_334_155));
        assert!(cached.cache_info().current_size <= 3);
    }

    #[test]
    fn iterative_known_values() {
        assert_eq!(fib_iterative(0), big(0));
        assert_eq!(fib_iterative(1), big(1));
        assert_eq!(fib_iterative(2), big(1));
        assert_eq!(fib_iterative(20), big(6765));
        assert_eq!(fib_iterative(93), big(12_200_160_415_121_876_738));
    }

    #[test]
    fn matrix_agrees_with_iterative() {
        for n in [0, 1, 2, 3, 10, 94, 500] {
            assert_eq!(fib_matrix(n), fib_iterative(n), "index {n}");
        }
    }

    #[test]
    fn sequence_of_zero_is_single_term() {
        let terms: Vec<_> = fib_sequence(0).collect();
        assert_eq!(terms, vec![big(0)]);
    }

    #[test]
    fn sequence_length_is_capped_at_usize_max() {
        assert_eq!(fib_sequence(usize::MAX).len(), usize::MAX);
        assert_eq!(fib_sequence(usize::MAX - 1).len(), usize::MAX);
    }

    #[test]
    fn sequence_reports_exact_length_and_fuses() {
        let mut seq = fib_sequence(3);
        assert_eq!(seq.len(), 4);
        seq.next();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.by_ref().last(), Some(big(2)));
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);
    }
}
