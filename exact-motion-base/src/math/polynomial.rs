use core::fmt;
use core::ops;

use crate::math::{EPSILON, approx_cmp, roots};

/// A polynomial in one real variable, with real coefficients.
///
/// Coefficients are stored in ascending order of degree (`coefficients()[i]` is the
/// coefficient of `x^i`) with trailing zero coefficients removed, so the zero
/// polynomial has no coefficients at all. Because of that trimming, the derived
/// [`PartialEq`] compares polynomials structurally and exactly; it is suitable for
/// noticing that two trajectories are literally the same function, not for deciding
/// whether two physical quantities are close.
///
/// All operations produce new values; a [`Polynomial`] is never modified in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Constructs a polynomial from coefficients in ascending order of degree.
    ///
    /// ```
    /// # extern crate exact_motion_base as exact_motion;
    /// use exact_motion::math::Polynomial;
    ///
    /// // 1 + 2x + 3x²
    /// let p = Polynomial::new([1.0, 2.0, 3.0]);
    /// assert_eq!(p.evaluate(2.0), 17.0);
    /// ```
    pub fn new(coefficients: impl IntoIterator<Item = f64>) -> Self {
        let mut coefficients: Vec<f64> = coefficients.into_iter().collect();
        while coefficients.last() == Some(&0.0) {
            coefficients.pop();
        }
        Self { coefficients }
    }

    /// The polynomial which is zero everywhere.
    #[inline]
    pub const fn zero() -> Self {
        Self {
            coefficients: Vec::new(),
        }
    }

    /// The polynomial whose value is `value` everywhere.
    #[inline]
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// The polynomial `x`.
    #[inline]
    pub fn identity() -> Self {
        Self::new([0.0, 1.0])
    }

    /// Coefficients in ascending order of degree, without trailing zeroes.
    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Returns the degree, or [`None`] for the zero polynomial.
    #[inline]
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    /// Returns whether this is the zero polynomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Evaluates the polynomial at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        // Horner's method
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |accumulator, &c| accumulator.mul_add(x, c))
    }

    /// Returns the first derivative.
    ///
    /// The derivative of a constant (or of the zero polynomial) is the zero polynomial.
    #[must_use]
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, &c)| c * i as f64),
        )
    }

    /// Returns the antiderivative whose value at 0 is `constant`.
    #[must_use]
    pub fn antiderivative(&self, constant: f64) -> Self {
        Self::new(
            core::iter::once(constant).chain(
                self.coefficients
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| c / (i + 1) as f64),
            ),
        )
    }

    /// Returns the polynomial `q` such that `q(x) = self(inner(x))`.
    #[must_use]
    pub fn compose(&self, inner: &Polynomial) -> Self {
        self.coefficients
            .iter()
            .rev()
            .fold(Polynomial::zero(), |accumulator, &c| accumulator * inner + c)
    }

    /// Returns the polynomial `q` such that `q(x) = self(x + shift)`.
    ///
    /// This is how a motion whose initial conditions are given at some time `t0` is
    /// re-expressed in absolute time: build it in terms of `t - t0`, then
    /// `offset(-t0)`.
    #[must_use]
    pub fn offset(&self, shift: f64) -> Self {
        self.compose(&Polynomial::new([shift, 1.0]))
    }

    /// Returns `self` multiplied by itself `exponent` times.
    /// `powi(0)` is the constant 1.
    #[must_use]
    pub fn powi(&self, exponent: u32) -> Self {
        (0..exponent).fold(Polynomial::constant(1.0), |product, _| product * self)
    }

    /// Returns the integral from 0 to `upper_bound` of `x · self(x)`.
    ///
    /// This is the radial integral used for masses and moments of rotationally symmetric
    /// bodies whose density is given as a function of radius.
    pub fn definite_integral(&self, upper_bound: f64) -> f64 {
        (self * &Polynomial::identity())
            .antiderivative(0.0)
            .evaluate(upper_bound)
    }

    /// Returns every real `x` for which `self(x) == target`, in ascending order.
    ///
    /// Complex roots whose imaginary part is within [`EPSILON`] of zero count as real.
    /// Roots closer together than [`EPSILON`] are reported once.
    /// A polynomial equal to `target` everywhere (or nowhere) has no isolated roots and
    /// yields an empty list.
    pub fn roots(&self, target: f64) -> Vec<f64> {
        let shifted = self - target;
        let mut found = roots::real_roots(&shifted.coefficients);
        found.sort_by(f64::total_cmp);
        found.dedup_by(|later, earlier| (*later - *earlier).abs() <= EPSILON);
        found
    }

    /// Returns the real roots of `self(x) == target` lying in the half-open range
    /// `(after, up_to]`, in ascending order.
    ///
    /// Both ends are compared with [`approx_cmp()`]: a root within [`EPSILON`] of
    /// `after` is excluded, and one within [`EPSILON`] of `up_to` is included.
    /// The lower exclusion is what keeps an event loop from finding the event it just
    /// resolved again.
    pub fn roots_in(&self, target: f64, after: f64, up_to: f64) -> Vec<f64> {
        let mut found = self.roots(target);
        found.retain(|&root| {
            approx_cmp(root, after).is_gt() && approx_cmp(root, up_to).is_le()
        });
        found
    }
}

impl From<f64> for Polynomial {
    #[inline]
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms = self
            .coefficients
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0.0)
            .peekable();
        if terms.peek().is_none() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, c) in terms {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match i {
                0 => write!(f, "{c}")?,
                _ => write!(f, "{c}x^{i}")?,
            }
        }
        Ok(())
    }
}

// --- Arithmetic ----------------------------------------------------------------------------------

impl ops::Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        Polynomial::new((0..len).map(|i| {
            self.coefficients.get(i).copied().unwrap_or(0.0)
                + rhs.coefficients.get(i).copied().unwrap_or(0.0)
        }))
    }
}

impl ops::Sub<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: &Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        Polynomial::new((0..len).map(|i| {
            self.coefficients.get(i).copied().unwrap_or(0.0)
                - rhs.coefficients.get(i).copied().unwrap_or(0.0)
        }))
    }
}

impl ops::Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut coefficients = vec![0.0; self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, &c) in self.coefficients.iter().enumerate() {
            for (j, &d) in rhs.coefficients.iter().enumerate() {
                coefficients[i + j] += c * d;
            }
        }
        Polynomial::new(coefficients)
    }
}

impl ops::Mul<f64> for &Polynomial {
    type Output = Polynomial;
    fn mul(self, rhs: f64) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|&c| c * rhs))
    }
}

impl ops::Add<f64> for &Polynomial {
    type Output = Polynomial;
    fn add(self, rhs: f64) -> Polynomial {
        self + &Polynomial::constant(rhs)
    }
}

impl ops::Sub<f64> for &Polynomial {
    type Output = Polynomial;
    fn sub(self, rhs: f64) -> Polynomial {
        self + -rhs
    }
}

impl ops::Neg for &Polynomial {
    type Output = Polynomial;
    fn neg(self) -> Polynomial {
        self * -1.0
    }
}

/// Implements the owned-operand forms of each operator by delegating to the borrowed ones.
macro_rules! forward_owned_ops {
    ($($trait:ident $method:ident;)*) => {
        $(
            impl ops::$trait<Polynomial> for Polynomial {
                type Output = Polynomial;
                #[inline]
                fn $method(self, rhs: Polynomial) -> Polynomial {
                    ops::$trait::$method(&self, &rhs)
                }
            }
            impl ops::$trait<&Polynomial> for Polynomial {
                type Output = Polynomial;
                #[inline]
                fn $method(self, rhs: &Polynomial) -> Polynomial {
                    ops::$trait::$method(&self, rhs)
                }
            }
            impl ops::$trait<Polynomial> for &Polynomial {
                type Output = Polynomial;
                #[inline]
                fn $method(self, rhs: Polynomial) -> Polynomial {
                    ops::$trait::$method(self, &rhs)
                }
            }
            impl ops::$trait<f64> for Polynomial {
                type Output = Polynomial;
                #[inline]
                fn $method(self, rhs: f64) -> Polynomial {
                    ops::$trait::$method(&self, rhs)
                }
            }
        )*
    };
}
forward_owned_ops! {
    Add add;
    Sub sub;
    Mul mul;
}

impl ops::Neg for Polynomial {
    type Output = Polynomial;
    #[inline]
    fn neg(self) -> Polynomial {
        -&self
    }
}

// -------------------------------------------------------------------------------------------------
