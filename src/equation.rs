//! Generic linear equations `y = k0 + k1*x1 + … + kn*xn`.

use crate::tuples::{Arity, Combiner, Fold, FoldStep, ForEach, TupleRefs, Visitor, ZipWith};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pseudo-arithmetic sentinel that drops a term from a linear equation.
///
/// `Ignored` absorbs under multiplication (`Ignored * v == Ignored`,
/// `v * Ignored == Ignored`) and is the identity under addition
/// (`Ignored + v == v`, `v + Ignored == v`), so a term involving it simply
/// vanishes from the running sum without the solve machinery special-casing
/// anything.
///
/// It can be used in two places:
///
/// - as a constructed coefficient, statically removing a term (most often the
///   constant `k0`):
///
/// ```
/// use linear_feedback::{equation, Ignored};
///
/// // y = 2*x1 + 3*x2, no constant term
/// let eq = equation!(Ignored; 2, 3);
/// assert_eq!(eq.solve((10, 100)), 320);
/// ```
///
/// - as a passed unknown, dynamically skipping a term at one call site while
///   leaving the coefficients intact:
///
/// ```
/// use linear_feedback::{equation, Ignored};
///
/// let eq = equation!(1; 2, 3);
/// assert_eq!(eq.solve((10, Ignored)), 1 + 2 * 10);
/// ```
///
/// The absorbing impls with `Ignored` on the *left* cover any right-hand
/// type. The mirrored direction (`v * Ignored`, `v + Ignored`) cannot be a
/// blanket impl (the orphan rule forbids `impl<T> Mul<Ignored> for T`), so it
/// is provided for the primitive numeric types and references to them;
/// user-defined coefficient types opt in by implementing `Mul<Ignored>` and
/// `Add<Ignored>` themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ignored;

impl<T> Mul<T> for Ignored {
    type Output = Ignored;

    fn mul(self, _rhs: T) -> Ignored {
        Ignored
    }
}

impl<'a, T> Mul<T> for &'a Ignored {
    type Output = Ignored;

    fn mul(self, _rhs: T) -> Ignored {
        Ignored
    }
}

impl<T> Add<T> for Ignored {
    type Output = T;

    fn add(self, rhs: T) -> T {
        rhs
    }
}

impl<'a, T> Add<T> for &'a Ignored {
    type Output = T;

    fn add(self, rhs: T) -> T {
        rhs
    }
}

impl Display for Ignored {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ignored")
    }
}

macro_rules! absorbed_by_ignored {
    ($($t:ty),+ $(,)?) => {$(
        impl Mul<Ignored> for $t {
            type Output = Ignored;
            fn mul(self, _rhs: Ignored) -> Ignored {
                Ignored
            }
        }

        impl<'a> Mul<&'a Ignored> for $t {
            type Output = Ignored;
            fn mul(self, _rhs: &'a Ignored) -> Ignored {
                Ignored
            }
        }

        impl<'a> Mul<Ignored> for &'a $t {
            type Output = Ignored;
            fn mul(self, _rhs: Ignored) -> Ignored {
                Ignored
            }
        }

        impl<'a, 'b> Mul<&'b Ignored> for &'a $t {
            type Output = Ignored;
            fn mul(self, _rhs: &'b Ignored) -> Ignored {
                Ignored
            }
        }

        impl Add<Ignored> for $t {
            type Output = $t;
            fn add(self, _rhs: Ignored) -> $t {
                self
            }
        }

        impl<'a> Add<&'a Ignored> for $t {
            type Output = $t;
            fn add(self, _rhs: &'a Ignored) -> $t {
                self
            }
        }

        impl<'a> Add<Ignored> for &'a $t {
            type Output = $t;
            fn add(self, _rhs: Ignored) -> $t {
                *self
            }
        }

        impl<'a, 'b> Add<&'b Ignored> for &'a $t {
            type Output = $t;
            fn add(self, _rhs: &'b Ignored) -> $t {
                *self
            }
        }
    )+};
}

absorbed_by_ignored!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

/// [`Combiner`] forming `coefficient * unknown` products (the default
/// multiplication order of [`LinearEquation::solve`]).
#[derive(Clone, Copy, Debug, Default)]
pub struct CoefficientLeft;

impl<K, X> Combiner<K, X> for CoefficientLeft
where
    K: Mul<X>,
{
    type Output = K::Output;

    fn combine(&mut self, coefficient: K, unknown: X) -> Self::Output {
        coefficient * unknown
    }
}

/// [`Combiner`] forming `unknown * coefficient` products, for coefficient
/// types whose multiplication does not commute (used by
/// [`LinearEquation::solve_reversed`]).
#[derive(Clone, Copy, Debug, Default)]
pub struct CoefficientRight;

impl<K, X> Combiner<K, X> for CoefficientRight
where
    X: Mul<K>,
{
    type Output = X::Output;

    fn combine(&mut self, coefficient: K, unknown: X) -> Self::Output {
        unknown * coefficient
    }
}

/// [`FoldStep`] accumulating terms with `+`, strictly left-to-right.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumTerms;

impl<Acc, T> FoldStep<Acc, T> for SumTerms
where
    Acc: Add<T>,
{
    type Folded = Acc::Output;

    fn step(&mut self, accumulator: Acc, term: T) -> Self::Folded {
        accumulator + term
    }
}

/// A linear equation `y = k0 + (k1 * x1) + (k2 * x2) + … + (kn * xn)`.
///
/// `k0` is the constant term; `kn` is a tuple of the non-constant
/// coefficients, each free to be a different type (owned value or
/// reference). The equation is a plain aggregate: it holds its coefficients
/// and nothing else, and [`solve`](Self::solve) is a pure function of those
/// coefficients and the unknowns it is given.
///
/// # Constructing
///
/// [`LinearEquation::new`] (or the [`equation!`](crate::equation) macro)
/// stores exactly what you pass it. Pass values to let the equation own
/// copies, references to bind it to caller-owned storage, or any mix of the
/// two:
///
/// ```
/// use linear_feedback::LinearEquation;
///
/// let k2 = 3.0;
/// // owns 1.0 and 2.0, borrows k2
/// let eq = LinearEquation::new(1.0, (2.0, &k2));
/// assert_eq!(eq.solve((10.0, 100.0)), 1.0 + 2.0 * 10.0 + 3.0 * 100.0);
/// ```
///
/// # Solving
///
/// Solving consumes the equation. Equations of `Copy` coefficients are
/// themselves `Copy` and can be solved again freely; for non-`Copy`
/// coefficients (matrices, say), [`by_ref`](Self::by_ref) yields a borrowing
/// equation to solve instead:
///
/// ```
/// use linear_feedback::LinearEquation;
/// use nalgebra::{DMatrix, DVector};
///
/// let eq = LinearEquation::new(
///     DVector::from_element(2, 1.0),
///     (DMatrix::from_element(2, 2, 0.5),),
/// );
/// let x = DVector::from_element(2, 4.0);
/// let y = eq.by_ref().solve((&x,));
/// assert_eq!(y, DVector::from_element(2, 5.0));
/// ```
///
/// Fewer unknowns than coefficients solves the prefix; *more* unknowns than
/// coefficients does not compile:
///
/// ```compile_fail
/// use linear_feedback::equation;
///
/// let eq = equation!(1.0; 2.0);
/// eq.solve((10.0, 20.0)); // two unknowns, one coefficient
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearEquation<K0, Kn> {
    /// The constant term.
    pub k0: K0,

    /// The non-constant coefficients, multiplied against the unknowns.
    pub kn: Kn,
}

impl<K0, Kn> LinearEquation<K0, Kn> {
    /// Builds the equation `k0 + (kn.0 * x1) + (kn.1 * x2) + …`.
    ///
    /// Fields are stored exactly as passed; see the [type-level
    /// docs](LinearEquation#constructing) for the ownership story.
    pub fn new(k0: K0, kn: Kn) -> Self {
        Self { k0, kn }
    }

    /// Borrows every coefficient, yielding an equation that can be solved
    /// without consuming (or cloning) this one.
    pub fn by_ref(&self) -> LinearEquation<&K0, Kn::Refs<'_>>
    where
        Kn: TupleRefs,
    {
        LinearEquation {
            k0: &self.k0,
            kn: self.kn.as_refs(),
        }
    }

    /// Computes `k0 + (k1 * x1) + … + (km * xm)` for `m` unknowns.
    ///
    /// `m` may be anything up to the number of non-constant coefficients
    /// (later coefficients go unused); more unknowns than coefficients is a
    /// compile-time error. `solve(())` returns `k0`.
    ///
    /// Multiplication is coefficient-left (`k * x`); addition is strictly
    /// left-to-right as the equation is written. No validation happens here:
    /// a panic raised by a coefficient's arithmetic propagates unchanged.
    pub fn solve<X>(
        self,
        unknowns: X,
    ) -> <<Kn as ZipWith<X, CoefficientLeft>>::Output as Fold<K0, SumTerms>>::Output
    where
        Kn: ZipWith<X, CoefficientLeft>,
        <Kn as ZipWith<X, CoefficientLeft>>::Output: Fold<K0, SumTerms>,
    {
        self.kn
            .zip_with(unknowns, &mut CoefficientLeft)
            .fold(self.k0, &mut SumTerms)
    }

    /// Like [`solve`](Self::solve), but forms each product as `x * k` for
    /// coefficient types whose multiplication does not commute (matrix
    /// coefficients against row-vector unknowns, say).
    ///
    /// Only the operand order of each multiplication changes; the addition
    /// order is identical to [`solve`](Self::solve).
    pub fn solve_reversed<X>(
        self,
        unknowns: X,
    ) -> <<Kn as ZipWith<X, CoefficientRight>>::Output as Fold<K0, SumTerms>>::Output
    where
        Kn: ZipWith<X, CoefficientRight>,
        <Kn as ZipWith<X, CoefficientRight>>::Output: Fold<K0, SumTerms>,
    {
        self.kn
            .zip_with(unknowns, &mut CoefficientRight)
            .fold(self.k0, &mut SumTerms)
    }
}

impl<K0, Kn: Arity> LinearEquation<K0, Kn> {
    /// The total number of coefficients, `k0` included.
    pub const SIZE: usize = 1 + Kn::ARITY;
}

/// [`Visitor`] writing `" + k*x{i}"` for each coefficient.
#[doc(hidden)]
pub struct FormatTerms<'a, 'b> {
    f: &'a mut Formatter<'b>,
    result: fmt::Result,
}

impl<T: Display> Visitor<T> for FormatTerms<'_, '_> {
    fn visit(&mut self, index: usize, element: &T) {
        if self.result.is_ok() {
            self.result = write!(self.f, " + {element}*x{}", index + 1);
        }
    }
}

impl<K0, Kn> Display for LinearEquation<K0, Kn>
where
    K0: Display,
    Kn: for<'a, 'b> ForEach<FormatTerms<'a, 'b>>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.k0)?;
        let mut terms = FormatTerms { f, result: Ok(()) };
        self.kn.for_each(&mut terms);
        terms.result
    }
}

/// Quickly construct a [`LinearEquation`] from its coefficients.
///
/// The constant term comes first, separated from the non-constant
/// coefficients by a semicolon:
///
/// ```
/// use linear_feedback::equation;
///
/// let eq = equation!(1.0; 2.0, 3.0);
/// assert_eq!(eq.solve((10.0, 100.0)), 321.0);
///
/// // just a constant
/// let flat = equation!(7);
/// assert_eq!(flat.solve(()), 7);
/// ```
#[macro_export]
macro_rules! equation {
    ($k0:expr) => {
        $crate::LinearEquation::new($k0, ())
    };
    ($k0:expr; $($kn:expr),+ $(,)?) => {
        $crate::LinearEquation::new($k0, ($($kn,)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{DMatrix, DVector, RowDVector};
    use quickcheck::{quickcheck, TestResult};
    use rstest::rstest;
    use uom::si::f64::{Length, Time, Velocity};
    use uom::si::{length::meter, time, velocity::meter_per_second};

    /// Symbolic term that records every operation applied to it, so tests
    /// can assert the exact operand order of the solve protocol.
    #[derive(Clone, Debug, PartialEq)]
    struct Sym(String);

    impl Sym {
        fn new(name: &str) -> Self {
            Sym(name.to_owned())
        }
    }

    impl Mul for Sym {
        type Output = Sym;
        fn mul(self, rhs: Sym) -> Sym {
            Sym(format!("({}*{})", self.0, rhs.0))
        }
    }

    impl Add for Sym {
        type Output = Sym;
        fn add(self, rhs: Sym) -> Sym {
            Sym(format!("({}+{})", self.0, rhs.0))
        }
    }

    #[test]
    fn solve_is_the_weighted_sum_plus_constant() {
        let eq = equation!(1; 2, 3, 4);
        assert_eq!(eq.solve((10, 100, 1000)), 1 + 20 + 300 + 4000);
    }

    #[test]
    fn solve_uses_a_prefix_of_the_coefficients() {
        let eq = equation!(1_i64; 2_i64, 3_i64, 4_i64);
        assert_eq!(eq.solve(()), 1);
        assert_eq!(eq.solve((10,)), 1 + 2 * 10);
        assert_eq!(eq.solve((10, 10)), 1 + 2 * 10 + 3 * 10);
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0, 0.0)]
    #[case(1.0, 0.0, 123.0, 1.0)]
    #[case(-1.0, 0.5, 10.0, 4.0)]
    #[case(2.5, -2.0, 0.25, 2.0)]
    fn solve_single_unknown_cases(
        #[case] k0: f64,
        #[case] k1: f64,
        #[case] x1: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(equation!(k0; k1).solve((x1,)), expected);
    }

    #[test]
    fn size_counts_the_constant_term() {
        assert_eq!(LinearEquation::<f64, (f64, f64)>::SIZE, 3);
        assert_eq!(LinearEquation::<f64, ()>::SIZE, 1);
    }

    #[test]
    fn default_multiplication_is_coefficient_left_and_addition_left_to_right() {
        let eq = LinearEquation::new(Sym::new("k0"), (Sym::new("k1"), Sym::new("k2")));
        let y = eq.solve((Sym::new("x1"), Sym::new("x2")));
        assert_eq!(y, Sym::new("((k0+(k1*x1))+(k2*x2))"));
    }

    #[test]
    fn reversed_multiplication_only_flips_the_products() {
        let eq = LinearEquation::new(Sym::new("k0"), (Sym::new("k1"), Sym::new("k2")));
        let y = eq.solve_reversed((Sym::new("x1"), Sym::new("x2")));
        assert_eq!(y, Sym::new("((k0+(x1*k1))+(x2*k2))"));
    }

    #[test]
    fn ignored_coefficient_contributes_nothing() {
        let eq = LinearEquation::new(Ignored, (Ignored, 5, Ignored));
        assert_eq!(eq.solve((2, 3, 4)), 5 * 3);
    }

    #[test]
    fn ignored_unknown_skips_the_term_at_the_call_site() {
        let eq = equation!(1; 2, 3);
        assert_eq!(eq.solve((Ignored, 10)), 1 + 3 * 10);
        // the coefficients are untouched for the next call
        assert_eq!(eq.solve((100, Ignored)), 1 + 2 * 100);
    }

    #[test]
    fn fully_ignored_equation_solves_to_ignored() {
        let eq = LinearEquation::new(Ignored, (Ignored,));
        assert_eq!(eq.solve((3,)), Ignored);
    }

    #[test]
    fn ignored_also_absorbs_through_references() {
        let eq = equation!(1.0; 2.0, 3.0);
        let y = eq.by_ref().solve((Ignored, 10.0));
        assert_eq!(y, 1.0 + 3.0 * 10.0);
    }

    #[test]
    fn owning_equations_never_alias_the_originals() {
        let mut k1 = 2.0;
        let eq = equation!(1.0; k1);
        k1 = 100.0;
        assert_eq!(eq.solve((10.0,)), 21.0);
        // silence "assigned but never read"
        let _ = k1;
    }

    #[test]
    fn borrowing_equations_read_the_callers_storage() {
        let mut k1 = 2.0;
        {
            let eq = equation!(1.0; &k1);
            assert_eq!(eq.solve((10.0,)), 21.0);
        }
        k1 = 3.0;
        let eq = equation!(1.0; &k1);
        assert_eq!(eq.solve((10.0,)), 31.0);
    }

    #[test]
    fn by_ref_solves_non_copy_coefficients_repeatedly() {
        let eq = LinearEquation::new(
            DVector::from_vec(vec![1.0, -1.0]),
            (DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]),),
        );

        let x = DVector::from_vec(vec![10.0, 100.0]);
        let first = eq.by_ref().solve((&x,));
        let second = eq.by_ref().solve((&x,));
        assert_eq!(first, DVector::from_vec(vec![211.0, 429.0]));
        assert_eq!(first, second);
    }

    #[test]
    fn reversed_multiplication_handles_non_commutative_operands() {
        // row vector * matrix only composes in that order
        let eq = LinearEquation::new(
            RowDVector::from_vec(vec![1.0, 1.0]),
            (DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]),),
        );
        let x = RowDVector::from_vec(vec![10.0, 100.0]);
        let y = eq.by_ref().solve_reversed((&x,));
        assert_eq!(y, RowDVector::from_vec(vec![311.0, 421.0]));
    }

    #[test]
    fn unit_typed_coefficients_compose() {
        // braking point: where you end up after coasting for t seconds
        let start = Length::new::<meter>(5.0);
        let speed = Velocity::new::<meter_per_second>(2.0);
        let eq = equation!(start; speed);

        let after = eq.solve((Time::new::<time::second>(3.0),));
        assert_eq!(after, Length::new::<meter>(11.0));
    }

    #[test]
    fn display_spells_the_equation_out() {
        let eq = equation!(1.5; 2, Ignored);
        assert_eq!(eq.to_string(), "1.5 + 2*x1 + ignored*x2");
    }

    quickcheck! {
        fn solve_matches_the_handwritten_sum(k0: f64, k1: f64, k2: f64, x1: f64, x2: f64) -> TestResult {
            // quickcheck will give us awkward f64 values -- we ignore those
            if ![k0, k1, k2, x1, x2].iter().all(|v| v.is_finite()) {
                return TestResult::discard();
            }
            let eq = equation!(k0; k1, k2);
            TestResult::from_bool(eq.solve((x1, x2)) == (k0 + k1 * x1) + (k2 * x2))
        }

        fn prefix_solve_ignores_trailing_coefficients(k0: f64, k1: f64, k2: f64, x1: f64) -> TestResult {
            if ![k0, k1, k2, x1].iter().all(|v| v.is_finite()) {
                return TestResult::discard();
            }
            let full = equation!(k0; k1, k2);
            let prefix = equation!(k0; k1);
            TestResult::from_bool(full.solve((x1,)) == prefix.solve((x1,)))
        }
    }
}
