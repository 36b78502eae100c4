//! Proportional-derivative feedback laws.

use std::ops::{Add, Mul};

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A proportional-derivative feedback law `u = kp*x + kd*dx`.
///
/// `x` is the error (or state) and `dx` its derivative; the two gains can be
/// of entirely different types, which is what lets the law stay unit-safe:
///
/// ```
/// use linear_feedback::Pd;
/// use uom::si::f64::{Frequency, Length, Velocity};
/// use uom::si::frequency::hertz;
/// use uom::si::length::meter;
/// use uom::si::velocity::meter_per_second;
///
/// // Position error in, velocity command out: kp must carry 1/s, and the
/// // compiler rejects any gain pairing that does not land on Velocity.
/// let law = Pd::new(Frequency::new::<hertz>(2.0), 0.5);
///
/// let command: Velocity = law.solve(
///     Length::new::<meter>(3.0),
///     Velocity::new::<meter_per_second>(-1.0),
/// );
/// assert_eq!(command.get::<meter_per_second>(), 2.0 * 3.0 + 0.5 * -1.0);
/// ```
///
/// For the everyday all-`f64` case:
///
/// ```
/// use linear_feedback::Pd;
///
/// let law = Pd::new(2.0, 0.5);
/// assert_eq!(law.solve(10.0, 4.0), 22.0);
/// ```
///
/// There are no validity hooks and no offset term; for those, see
/// [`LinearModel`](crate::LinearModel). Solving is pure, and panics from the
/// gain types' arithmetic propagate unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pd<Kp, Kd> {
    /// Gain applied to the error.
    pub kp: Kp,

    /// Gain applied to the error's derivative.
    pub kd: Kd,
}

/// The same law under the name control code tends to use for the struct that
/// holds it.
///
/// Alias of [`Pd`]; the two are interchangeable.
pub type PdController<Kp, Kd> = Pd<Kp, Kd>;

impl<Kp, Kd> Pd<Kp, Kd> {
    /// Builds the law `u = kp*x + kd*dx`.
    pub fn new(kp: Kp, kd: Kd) -> Self {
        Self { kp, kd }
    }

    /// Borrows both gains, yielding a law that can be solved without
    /// consuming (or cloning) this one.
    pub fn by_ref(&self) -> Pd<&Kp, &Kd> {
        Pd {
            kp: &self.kp,
            kd: &self.kd,
        }
    }

    /// Computes `kp*x + kd*dx`.
    ///
    /// Gains multiply from the left, and the proportional term is the
    /// left-hand side of the addition, which pins down the result type for
    /// non-commutative gains.
    pub fn solve<X, Dx>(self, x: X, dx: Dx) -> <Kp::Output as Add<Kd::Output>>::Output
    where
        Kp: Mul<X>,
        Kd: Mul<Dx>,
        Kp::Output: Add<Kd::Output>,
    {
        self.kp * x + self.kd * dx
    }
}

#[cfg(any(test, feature = "approx"))]
impl<Kp: AbsDiffEq, Kd> AbsDiffEq for Pd<Kp, Kd>
where
    Kd: AbsDiffEq<Epsilon = Kp::Epsilon>,
    Kp::Epsilon: Clone,
{
    type Epsilon = Kp::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Kp::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.kp.abs_diff_eq(&other.kp, epsilon.clone()) && self.kd.abs_diff_eq(&other.kd, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<Kp: RelativeEq, Kd> RelativeEq for Pd<Kp, Kd>
where
    Kd: RelativeEq<Epsilon = Kp::Epsilon>,
    Kp::Epsilon: Clone,
{
    fn default_max_relative() -> Self::Epsilon {
        Kp::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.kp
            .relative_eq(&other.kp, epsilon.clone(), max_relative.clone())
            && self.kd.relative_eq(&other.kd, epsilon, max_relative)
    }
}
