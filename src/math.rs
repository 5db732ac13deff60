use std::ops::Mul;

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// A 2x2 matrix over arbitrary precision unsigned integers, laid out as
/// `[[a, b], [c, d]]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix2 {
    pub a: BigUint,
    pub b: BigUint,
    pub c: BigUint,
    pub d: BigUint,
}

impl Matrix2 {
    pub fn identity() -> Self {
        Matrix2 {
            a: BigUint::one(),
            b: BigUint::zero(),
            c: BigUint::zero(),
            d: BigUint::one(),
        }
    }

    /// The Fibonacci Q-matrix `[[1, 1], [1, 0]]`. Its n-th power is
    /// `[[F(n+1), F(n)], [F(n), F(n-1)]]`.
    pub fn fibonacci_q() -> Self {
        Matrix2 {
            a: BigUint::one(),
            b: BigUint::one(),
            c: BigUint::one(),
            d: BigUint::zero(),
        }
    }

    // Exponentiation by squaring (O(log n) multiplications)
    pub fn pow(&self, mut exp: usize) -> Self {
        let mut base = self.clone();
        let mut result = Matrix2::identity();

        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            exp >>= 1;
            if exp > 0 {
                base = &base * &base;
            }
        }

        result
    }
}

impl Mul for &Matrix2 {
    type Output = Matrix2;

    fn mul(self, rhs: Self) -> Matrix2 {
        Matrix2 {
            a: &self.a * &rhs.a + &self.b * &rhs.c,
            b: &self.a * &rhs.b + &self.b * &rhs.d,
            c: &self.c * &rhs.a + &self.d * &rhs.c,
            d: &self.c * &rhs.b + &self.d * &rhs.d,
        }
    }
}
