//! Affine models `y = offset + coefficients * x` with opt-in validity checks.

use std::ops::{Add, Mul};

use nalgebra::{DMatrix, DVector, Scalar};

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marks a [`LinearModel`] as having no offset term at all.
///
/// This is a type-level fact, not a zero value: a model typed with
/// `NoOffset` has no offset storage and its solve path is just
/// `coefficients * x`. `NoOffset` is the identity under addition, which is
/// what lets one solve implementation cover both model shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoOffset;

impl<T> Add<T> for NoOffset {
    type Output = T;

    fn add(self, rhs: T) -> T {
        rhs
    }
}

impl<'a, T> Add<T> for &'a NoOffset {
    type Output = T;

    fn add(self, rhs: T) -> T {
        rhs
    }
}

/// Wraps a present offset term of a [`LinearModel`].
///
/// Constructed for you by [`LinearModel::with_offset`]; the wrapper is what
/// makes "has an offset" a property of the model's *type* rather than a
/// runtime flag (see [`LinearModel::HAS_OFFSET`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WithOffset<O>(pub O);

impl<O, P> Add<P> for WithOffset<O>
where
    O: Add<P>,
{
    type Output = O::Output;

    fn add(self, rhs: P) -> Self::Output {
        self.0 + rhs
    }
}

impl<'a, O, P> Add<P> for &'a WithOffset<O>
where
    &'a O: Add<P>,
{
    type Output = <&'a O as Add<P>>::Output;

    fn add(self, rhs: P) -> Self::Output {
        &self.0 + rhs
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::NoOffset {}
    impl<O> Sealed for super::WithOffset<O> {}
    impl<'a, T: Sealed> Sealed for &'a T {}
}

/// The offset slot of a [`LinearModel`]: either [`NoOffset`] or
/// [`WithOffset`] (possibly behind references).
///
/// This trait is sealed, and so cannot be implemented by user code.
pub trait OffsetState: private::Sealed {
    /// Whether models with this offset state carry an offset term.
    const PRESENT: bool;

    /// The user-facing offset type ([`NoOffset`] when absent).
    type Inner;

    /// Borrows the user-facing offset value.
    fn inner(&self) -> &Self::Inner;
}

impl OffsetState for NoOffset {
    const PRESENT: bool = false;
    type Inner = NoOffset;

    fn inner(&self) -> &NoOffset {
        self
    }
}

impl<O> OffsetState for WithOffset<O> {
    const PRESENT: bool = true;
    type Inner = O;

    fn inner(&self) -> &O {
        &self.0
    }
}

impl<'a, O: OffsetState> OffsetState for &'a O {
    const PRESENT: bool = O::PRESENT;
    type Inner = O::Inner;

    fn inner(&self) -> &Self::Inner {
        (*self).inner()
    }
}

/// Internal-consistency check for a coefficient type, consulted by
/// [`LinearModel::is_valid`].
///
/// The provided method body returns `true`, so opting a coefficient type in
/// is a one-line empty impl; override the method when the coefficients can
/// disagree with the offset internally (eg, a gains matrix whose row count
/// must match the offset vector's length — the impl this crate ships for
/// [`DMatrix`]). `O` is the model's offset type; it defaults to [`NoOffset`]
/// so offset-free impls read naturally:
///
/// ```
/// use linear_feedback::IsValid;
///
/// struct Gains {
///     per_joint: Vec<f64>,
/// }
///
/// impl IsValid for Gains {
///     fn is_valid(&self, _: &linear_feedback::NoOffset) -> bool {
///         !self.per_joint.is_empty()
///     }
/// }
/// ```
///
/// All primitive numeric types are unconditionally valid.
pub trait IsValid<O = NoOffset> {
    /// Whether the model built from these coefficients (and this offset) is
    /// internally consistent.
    fn is_valid(&self, offset: &O) -> bool {
        let _ = offset;
        true
    }
}

/// Domain check for a coefficient type against one concrete input, consulted
/// by [`LinearModel::accepts`].
///
/// As with [`IsValid`], the provided body returns `true`; override it when
/// only some inputs compose with the coefficients (eg, a gains matrix whose
/// column count must match the input vector's length).
pub trait Accepts<X> {
    /// Whether `unknowns` is in this model's domain.
    fn accepts(&self, unknowns: &X) -> bool {
        let _ = unknowns;
        true
    }
}

impl<'a, C, O> IsValid<O> for &'a C
where
    C: IsValid<O>,
{
    fn is_valid(&self, offset: &O) -> bool {
        (**self).is_valid(offset)
    }
}

impl<'a, C, X> Accepts<X> for &'a C
where
    C: Accepts<X>,
{
    fn accepts(&self, unknowns: &X) -> bool {
        (**self).accepts(unknowns)
    }
}

macro_rules! unconditionally_valid {
    ($($t:ty),+ $(,)?) => {$(
        impl<O> IsValid<O> for $t {}
        impl<X> Accepts<X> for $t {}
    )+};
}

unconditionally_valid!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl<T: Scalar> IsValid<DVector<T>> for DMatrix<T> {
    fn is_valid(&self, offset: &DVector<T>) -> bool {
        self.nrows() == offset.len()
    }
}

impl<T: Scalar> IsValid<NoOffset> for DMatrix<T> {}

impl<T: Scalar> Accepts<DVector<T>> for DMatrix<T> {
    fn accepts(&self, unknowns: &DVector<T>) -> bool {
        self.ncols() == unknowns.len()
    }
}

impl<'a, T: Scalar> Accepts<&'a DVector<T>> for DMatrix<T> {
    fn accepts(&self, unknowns: &&'a DVector<T>) -> bool {
        self.ncols() == unknowns.len()
    }
}

/// An affine model `y = offset + (coefficients * x)`, or `y = coefficients *
/// x` when built without an offset.
///
/// Whether the offset exists is part of the model's *type*
/// ([`HAS_OFFSET`](Self::HAS_OFFSET)), so an offset-free model stores
/// nothing for it and pays nothing for it.
///
/// # Validity and acceptance
///
/// Coefficient types opt into pre-solve checks by implementing [`IsValid`]
/// (is the model internally consistent?) and [`Accepts`] (does this
/// particular input compose with the coefficients?). Both default to `true`.
/// [`solve`](Self::solve) checks them with `debug_assert!` only: a violating
/// call aborts in debug builds and is semantically unspecified in release
/// builds. Callers that need graceful handling use
/// [`try_solve`](Self::try_solve), which never asserts and returns `None`
/// instead.
///
/// ```
/// use linear_feedback::LinearModel;
///
/// let model = LinearModel::with_offset(2, 3);
/// assert_eq!(model.solve(5), 3 + 2 * 5);
///
/// let unbiased = LinearModel::without_offset(2);
/// assert_eq!(unbiased.solve(5), 10);
/// ```
///
/// The same shape scales to gains matrices:
///
/// ```
/// use linear_feedback::LinearModel;
/// use nalgebra::{DMatrix, DVector};
///
/// let model = LinearModel::with_offset(
///     DMatrix::from_row_slice(2, 3, &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]),
///     DVector::from_vec(vec![10.0, 20.0]),
/// );
///
/// let joints = DVector::from_vec(vec![1.0, 2.0, 3.0]);
/// assert!(model.is_valid());
/// assert!(model.accepts(&&joints));
/// assert_eq!(
///     model.by_ref().try_solve(&joints),
///     Some(DVector::from_vec(vec![12.0, 24.0])),
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearModel<C, O = NoOffset> {
    /// Multiplied against the input on every solve.
    pub coefficients: C,

    /// Added to the product; [`NoOffset`] or [`WithOffset`].
    pub offset: O,
}

impl<C> LinearModel<C, NoOffset> {
    /// Builds the model `y = coefficients * x`.
    pub fn without_offset(coefficients: C) -> Self {
        Self {
            coefficients,
            offset: NoOffset,
        }
    }
}

impl<C, O> LinearModel<C, WithOffset<O>> {
    /// Builds the model `y = offset + (coefficients * x)`.
    pub fn with_offset(coefficients: C, offset: O) -> Self {
        Self {
            coefficients,
            offset: WithOffset(offset),
        }
    }
}

impl<C, O: OffsetState> LinearModel<C, O> {
    /// Whether this model type carries an offset term.
    ///
    /// ```
    /// use linear_feedback::{LinearModel, NoOffset, WithOffset};
    ///
    /// assert!(!LinearModel::<f64>::HAS_OFFSET);
    /// assert!(LinearModel::<f64, WithOffset<f64>>::HAS_OFFSET);
    /// ```
    pub const HAS_OFFSET: bool = O::PRESENT;

    /// Borrows the coefficients and offset, yielding a model that can be
    /// solved without consuming (or cloning) this one.
    pub fn by_ref(&self) -> LinearModel<&C, &O> {
        LinearModel {
            coefficients: &self.coefficients,
            offset: &self.offset,
        }
    }

    /// Whether the model is internally consistent, per the coefficient
    /// type's [`IsValid`] impl (`true` unless overridden).
    pub fn is_valid(&self) -> bool
    where
        C: IsValid<O::Inner>,
    {
        self.coefficients.is_valid(self.offset.inner())
    }

    /// Whether `unknowns` is in the model's domain, per the coefficient
    /// type's [`Accepts`] impl (`true` unless overridden).
    pub fn accepts<X>(&self, unknowns: &X) -> bool
    where
        C: Accepts<X>,
    {
        self.coefficients.accepts(unknowns)
    }

    /// Computes `offset + (coefficients * unknowns)` (just the product for
    /// offset-free models).
    ///
    /// Debug builds assert [`is_valid`](Self::is_valid) and
    /// [`accepts`](Self::accepts) first; release builds skip the checks and
    /// the result of solving an invalid model is unspecified. Panics from
    /// the coefficient type's arithmetic propagate unchanged.
    pub fn solve<X>(self, unknowns: X) -> <O as Add<<C as Mul<X>>::Output>>::Output
    where
        C: Mul<X> + IsValid<O::Inner> + Accepts<X>,
        O: Add<<C as Mul<X>>::Output>,
    {
        debug_assert!(
            self.is_valid(),
            "solving a model whose parameters disagree internally"
        );
        debug_assert!(
            self.accepts(&unknowns),
            "solving a model against input outside its domain"
        );

        self.offset + self.coefficients * unknowns
    }

    /// Non-asserting counterpart of [`solve`](Self::solve): `None` when
    /// [`is_valid`](Self::is_valid) or [`accepts`](Self::accepts) fails, in
    /// debug and release builds alike.
    pub fn try_solve<X>(self, unknowns: X) -> Option<<O as Add<<C as Mul<X>>::Output>>::Output>
    where
        C: Mul<X> + IsValid<O::Inner> + Accepts<X>,
        O: Add<<C as Mul<X>>::Output>,
    {
        if self.is_valid() && self.accepts(&unknowns) {
            Some(self.offset + self.coefficients * unknowns)
        } else {
            None
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl<O: AbsDiffEq> AbsDiffEq for WithOffset<O>
where
    O::Epsilon: Clone,
{
    type Epsilon = O::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        O::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<O: RelativeEq> RelativeEq for WithOffset<O>
where
    O::Epsilon: Clone,
{
    fn default_max_relative() -> Self::Epsilon {
        O::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<C: AbsDiffEq> AbsDiffEq for LinearModel<C, NoOffset>
where
    C::Epsilon: Clone,
{
    type Epsilon = C::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        C::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.coefficients.abs_diff_eq(&other.coefficients, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl<C: AbsDiffEq, O> AbsDiffEq for LinearModel<C, WithOffset<O>>
where
    O: AbsDiffEq<Epsilon = C::Epsilon>,
    C::Epsilon: Clone,
{
    type Epsilon = C::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        C::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.coefficients
            .abs_diff_eq(&other.coefficients, epsilon.clone())
            && self.offset.abs_diff_eq(&other.offset, epsilon)
    }
}
