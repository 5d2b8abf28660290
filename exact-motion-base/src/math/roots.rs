//! Real root finding for [`Polynomial`](super::Polynomial)s.
//!
//! Degrees up to 2 are solved in closed form. Higher degrees go through the eigenvalues
//! of the companion matrix, which yields complex roots; those close enough to the real
//! axis are kept. Every estimate is then polished with Newton's method and kept only if
//! the polynomial really is zero there.

use nalgebra::DMatrix;

use crate::math::EPSILON;

/// Leading coefficients smaller than this fraction of the largest coefficient may be
/// cancellation noise. Roots of the polynomial without them are tried as well as roots of
/// the whole, but every root is judged against the whole.
const NEGLIGIBLE_LEADING_COEFFICIENT: f64 = 1e-12;

/// Largest residual a root may have, relative to the sum of the magnitudes of the terms
/// at that root. Polished roots are many orders of magnitude inside this; near-real
/// complex pairs accepted under [`EPSILON`] are a few orders inside it.
const RESIDUAL_TOLERANCE: f64 = 1e-9;

const NEWTON_ITERATIONS: usize = 8;

/// Returns the real roots of the polynomial with the given ascending coefficients,
/// in no particular order and possibly with repeats.
///
/// Each root returned has been polished against, and checked against, the complete
/// coefficient list.
pub(crate) fn real_roots(coefficients: &[f64]) -> Vec<f64> {
    let mut len = coefficients.len();
    while len > 0 && coefficients[len - 1] == 0.0 {
        len -= 1;
    }
    let whole = &coefficients[..len];
    let scale = whole.iter().fold(0.0f64, |m, c| m.max(c.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Vec::new();
    }

    let mut estimates = solve(whole);
    let mut significant = len;
    while significant > 0
        && whole[significant - 1].abs() <= scale * NEGLIGIBLE_LEADING_COEFFICIENT
    {
        significant -= 1;
    }
    if significant < len {
        estimates.extend(solve(&whole[..significant]));
    }

    estimates
        .into_iter()
        .map(|root| polish(whole, root))
        .filter(|&root| {
            let accepted = is_root(whole, root);
            if !accepted {
                log::trace!("rejecting {root} as a root of {whole:?}");
            }
            accepted
        })
        .collect()
}

/// Approximate real roots, without checking.
fn solve(coefficients: &[f64]) -> Vec<f64> {
    match *coefficients {
        [] | [_] => Vec::new(),
        [c0, c1] => vec![-c0 / c1],
        [c, b, a] => quadratic(a, b, c),
        _ => companion_eigenvalues(coefficients),
    }
}

/// Whether the polynomial is zero at `x`, up to rounding in its terms.
fn is_root(coefficients: &[f64], x: f64) -> bool {
    let (value, _) = evaluate(coefficients, x);
    let magnitude = coefficients
        .iter()
        .rev()
        .fold(0.0, |total: f64, c| total.mul_add(x.abs(), c.abs()));
    value.abs() <= RESIDUAL_TOLERANCE * magnitude
}

/// Solves `a·x² + b·x + c = 0` without the cancellation of the textbook formula.
fn quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        // Complex pair −b/2a ± i·√(−d)/2a; keep it if it is real within tolerance.
        let imaginary = (-discriminant).sqrt() / (2.0 * a.abs());
        return if imaginary <= EPSILON {
            vec![-b / (2.0 * a)]
        } else {
            Vec::new()
        };
    }
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        // b and the discriminant are both zero.
        return vec![0.0];
    }
    vec![q / a, c / q]
}

/// Real parts of the companion matrix eigenvalues whose imaginary parts are negligible.
///
/// The variable is first rescaled so that the roots are of order 1, which keeps the
/// companion matrix from mixing entries of wildly different sizes.
fn companion_eigenvalues(coefficients: &[f64]) -> Vec<f64> {
    let degree = coefficients.len() - 1;
    let leading = coefficients[degree];
    // Every root is within twice this bound (Fujiwara).
    let bound = (0..degree)
        .map(|i| (coefficients[i] / leading).abs().powf(1.0 / (degree - i) as f64))
        .fold(0.0f64, f64::max);
    let scale = if bound > 0.0 && bound.is_finite() {
        bound
    } else {
        1.0
    };
    // Coefficients of p(scale·y) / (leading·scaleⁿ), whose leading coefficient is 1.
    let mut scaled = vec![0.0; degree];
    let mut factor = 1.0;
    for i in (0..degree).rev() {
        factor *= scale;
        scaled[i] = coefficients[i] / leading / factor;
    }

    let companion = DMatrix::<f64>::from_fn(degree, degree, |row, column| {
        if column == degree - 1 {
            -scaled[row]
        } else if row == column + 1 {
            1.0
        } else {
            0.0
        }
    });

    let eigenvalues = companion.complex_eigenvalues();
    log::trace!("companion eigenvalues of {coefficients:?} at scale {scale}: {eigenvalues:?}");
    eigenvalues
        .iter()
        .map(|z| (z.re * scale, z.im * scale))
        .filter(|&(re, im)| im.abs() <= EPSILON * re.abs().max(1.0))
        .map(|(re, _)| re)
        .collect()
}

/// Refines an approximate root by Newton's method, keeping each step only if it reduces
/// the residual. Near a multiple root the derivative vanishes and the estimate is left
/// as it was.
fn polish(coefficients: &[f64], mut root: f64) -> f64 {
    let mut residual = evaluate(coefficients, root).0.abs();
    for _ in 0..NEWTON_ITERATIONS {
        if residual == 0.0 {
            break;
        }
        let (value, slope) = evaluate(coefficients, root);
        if slope == 0.0 || !slope.is_finite() {
            break;
        }
        let candidate = root - value / slope;
        let candidate_residual = evaluate(coefficients, candidate).0.abs();
        if candidate_residual.is_nan() || candidate_residual >= residual {
            break;
        }
        root = candidate;
        residual = candidate_residual;
    }
    root
}

/// Evaluates the polynomial and its derivative together.
fn evaluate(coefficients: &[f64], x: f64) -> (f64, f64) {
    coefficients
        .iter()
        .rev()
        .fold((0.0, 0.0), |(value, slope), &c| {
            (value.mul_add(x, c), slope.mul_add(x, value))
        })
}
