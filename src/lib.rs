//! # Fibonacci and π Series Library
//!
//! This library collects small, self-contained demonstrations of two classic computations: the
//! n-th Fibonacci number, computed with a series of increasingly refined techniques, and an
//! approximation of π from the partial sums of the Gregory–Leibniz series. Fibonacci values are
//! arbitrary precision (`BigUint`), so every strategy is exact for any index it terminates on.
//!
//! ## Overview of Functions
//!
//! ### Errors
//! - `FibonacciError`: returned by the base-case-free recursion once it reaches its recursion
//!   limit, which it always does.
//!
//! ### Fibonacci Computation Approaches
//!
//! #### `fib_unbounded`
//! Recursion with no base case. It never produces a value; it exists to show why a base case
//! is needed.
//!
//! #### `fib_recursive`
//! Recursion with the base case `F(n) = n` for `n < 2`. Correct, but the number of calls grows
//! exponentially with `n`. `fib_recursive_counted` also reports the call count.
//!
//! #### `FibonacciMemo`
//! Manual memoization through an explicit index → value map seeded with `F(0)` and `F(1)`.
//!
//! #### `CachedFibonacci` / `fib_cached`
//! The same recursion as `fib_recursive`, wrapped by the generic compute-or-fetch cache in
//! [`memo`], which supports unbounded and LRU storage.
//!
//! #### `fib_iterative`
//! Two running accumulators, O(n) time and O(1) extra space.
//!
//! #### `fib_sequence`
//! A one-shot iterator producing `F(0)..=F(n)` on demand.
//!
//! #### `fib_matrix`
//! Exponentiation of the Fibonacci Q-matrix in O(log n) multiplications.
//!
//! ### π Approximation
//!
//! #### `calculate_pi`
//! Sums `4/1 - 4/3 + 4/5 - ...` over a caller-chosen number of terms.
//!
//! #### `calculate_pi_parallel`
//! The same series, summed with Rayon.
//!
//! ## Usage Example
//! ```rust
//! use fibonacci_pi::fibonacci::{fib_iterative, FibonacciMemo};
//! use fibonacci_pi::pi::calculate_pi;
//! use num_bigint::BigUint;
//!
//! let mut memo = FibonacciMemo::new();
//! assert_eq!(memo.fib(50), fib_iterative(50));
//! assert_eq!(fib_iterative(50), BigUint::from(12_586_269_025u64));
//! assert_eq!(calculate_pi(1), 4.0);
//! ```

pub mod fibonacci;
pub mod math;
pub mod memo;
pub mod pi;
