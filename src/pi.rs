use log::debug;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Approximates π with the first `terms` terms of the Gregory–Leibniz series
/// `4/1 - 4/3 + 4/5 - 4/7 + ...`.
///
/// The error shrinks roughly as `1/terms`; see [`error_bound`]. Zero terms
/// give `0.0`.
///
/// # Example
/// ```
/// use fibonacci_pi::pi::calculate_pi;
/// assert_eq!(calculate_pi(1), 4.0);
/// assert!((calculate_pi(100_000) - std::f64::consts::PI).abs() < 1e-4);
/// ```
pub fn calculate_pi(terms: usize) -> f64 {
    debug!("summing {terms} Gregory-Leibniz terms");
    let numerator = 4.0;
    let mut denominator = 1.0;
    let mut sign = 1.0;
    let mut pi = 0.0;

    for _ in 0..terms {
        pi += sign * (numerator / denominator);
        denominator += 2.0;
        sign = -sign;
    }

    pi
}

// k-th term of the series, counting from zero
fn leibniz_term(k: usize) -> f64 {
    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
    sign * 4.0 / (2.0 * k as f64 + 1.0)
}

/// Same series as [`calculate_pi`], with the terms summed on the rayon pool.
///
/// The summation order differs, so the result may differ from the
/// sequential one in the last few bits.
pub fn calculate_pi_parallel(terms: usize) -> f64 {
    debug!("summing {terms} Gregory-Leibniz terms in parallel");
    (0..terms).into_par_iter().map(leibniz_term).sum()
}

/// Upper bound on `|calculate_pi(terms) - π|`: the magnitude of the first
/// omitted term, `4 / (2·terms + 1)`.
pub fn error_bound(terms: usize) -> f64 {
    4.0 / (2.0 * terms as f64 + 1.0)
}
