//! Fixed-arity heterogeneous tuple algebra.
//!
//! [`LinearEquation`](crate::LinearEquation) stores its coefficients in a plain
//! Rust tuple, so "one gain per joint, each with its own type" needs no
//! allocation and no common supertype. This module provides the small algebra
//! the solve protocol is built from — and that callers can reuse for their own
//! coefficient bookkeeping:
//!
//! - [`ZipWith`] walks two tuples in lockstep and combines corresponding
//!   elements through a [`Combiner`];
//! - [`Fold`] reduces a tuple left-to-right from a caller-supplied seed
//!   through a [`FoldStep`], with the accumulator free to change type at
//!   every step;
//! - [`Map`] transforms a single tuple position-wise through a [`Mapper`];
//! - [`ForEach`] visits a tuple by reference through a [`Visitor`], which
//!   always receives the zero-based position of the element;
//! - [`TupleRefs`] borrows every element, turning `(A, B)` into `(&A, &B)`;
//! - [`Arity`] exposes the tuple's length as an associated const.
//!
//! All of the above are implemented for tuples up to arity 8. Positional
//! access is native field access (`t.0`, `t.1`, …) and therefore rejects
//! out-of-range positions at compile time; the [`pick!`](crate::pick) macro
//! builds on that for index-filtered access.
//!
//! Zipping is left-biased: extra elements of the *left* tuple are simply not
//! visited, while a right-hand tuple longer than the left does not compile.
//! This is deliberate — it is exactly the arity rule of
//! [`LinearEquation::solve`](crate::LinearEquation::solve), where a prefix of
//! the coefficients may be used but surplus unknowns are a bug.

/// The number of elements in a tuple, as a compile-time constant.
pub trait Arity {
    /// How many elements this tuple holds.
    const ARITY: usize;
}

/// Element-wise borrowing of a tuple: `(A, B)` becomes `(&A, &B)`.
///
/// This is how a non-`Copy` composite (eg, an equation over
/// [`DMatrix`](nalgebra::DMatrix) gains) gets solved repeatedly without
/// cloning its coefficients; see
/// [`LinearEquation::by_ref`](crate::LinearEquation::by_ref).
pub trait TupleRefs {
    /// `Self` with every element replaced by a reference to it.
    type Refs<'a>
    where
        Self: 'a;

    /// Borrows each element in place.
    fn as_refs(&self) -> Self::Refs<'_>;
}

/// A position-wise operation for [`Map`].
///
/// A mapper states, per element type it supports, what it turns that element
/// into. A tuple can only be mapped by a mapper that covers *all* of its
/// element types; a missing impl is a compile-time error, never a silent
/// skip.
pub trait Mapper<T> {
    /// What `T` is mapped to.
    type Output;

    /// Transforms one element.
    fn apply(&mut self, element: T) -> Self::Output;
}

/// Position-wise transform of a tuple through a [`Mapper`].
pub trait Map<F> {
    /// The tuple of mapped elements.
    type Output;

    /// Consumes the tuple, producing a new tuple of the same arity.
    fn map(self, f: &mut F) -> Self::Output;
}

/// A pairwise operation for [`ZipWith`].
pub trait Combiner<L, R> {
    /// What combining an `L` with an `R` yields.
    type Output;

    /// Combines one pair of corresponding elements.
    fn combine(&mut self, left: L, right: R) -> Self::Output;
}

/// Combines two tuples position-wise through a [`Combiner`].
///
/// The output has the arity of `Rhs`; trailing elements of `self` beyond that
/// are dropped. There is deliberately no impl for an `Rhs` longer than
/// `self`.
///
/// ```
/// use linear_feedback::tuples::{Combiner, ZipWith};
///
/// struct Scale;
/// impl Combiner<f64, f64> for Scale {
///     type Output = f64;
///     fn combine(&mut self, l: f64, r: f64) -> f64 {
///         l * r
///     }
/// }
///
/// assert_eq!((2.0, 3.0, 4.0).zip_with((10.0, 10.0), &mut Scale), (20.0, 30.0));
/// ```
pub trait ZipWith<Rhs, F> {
    /// The tuple of combined elements; same arity as `Rhs`.
    type Output;

    /// Consumes both tuples, combining corresponding elements.
    fn zip_with(self, rhs: Rhs, f: &mut F) -> Self::Output;
}

/// One step of a [`Fold`].
///
/// The accumulator may change type from step to step; `Folded` is the
/// accumulator type this step hands to the next one.
pub trait FoldStep<Acc, T> {
    /// The accumulator produced by this step.
    type Folded;

    /// Folds one element into the running accumulator.
    fn step(&mut self, accumulator: Acc, element: T) -> Self::Folded;
}

/// Left-to-right reduction of a tuple from a caller-supplied seed.
///
/// `(a, b, c).fold(s, f)` computes `f(f(f(s, a), b), c)`, strictly in that
/// order. The empty tuple folds to the seed unchanged.
pub trait Fold<Seed, F> {
    /// The final accumulator.
    type Output;

    /// Consumes the tuple, threading the accumulator through every element.
    fn fold(self, seed: Seed, f: &mut F) -> Self::Output;
}

/// A by-reference visitor for [`ForEach`].
///
/// The visitor receives the zero-based position alongside each element. As
/// with [`Mapper`], it must cover every element type of the visited tuple.
pub trait Visitor<T: ?Sized> {
    /// Visits one element.
    fn visit(&mut self, index: usize, element: &T);
}

/// Visits every element of a tuple, in order, by reference.
pub trait ForEach<V> {
    /// Runs the visitor over all elements.
    fn for_each(&self, visitor: &mut V);
}

/// Builds a new tuple from an explicit list of positions of an existing one.
///
/// The positions need not be contiguous, distinct, or ascending; an
/// out-of-range position is a compile-time error. Re-using a position twice
/// requires the element to be `Copy`.
///
/// ```
/// let t = (10, "mid", 30);
/// assert_eq!(linear_feedback::pick!(t => 2, 0, 0), (30, 10, 10));
/// ```
///
/// ```compile_fail
/// let t = (10, 20);
/// linear_feedback::pick!(t => 5); // no field `5` on a 2-tuple
/// ```
#[macro_export]
macro_rules! pick {
    ($tuple:expr => $($index:tt),+ $(,)?) => {{
        let picked = $tuple;
        ($(picked.$index,)+)
    }};
}

impl Arity for () {
    const ARITY: usize = 0;
}

impl TupleRefs for () {
    type Refs<'a> = ();
    fn as_refs(&self) -> Self::Refs<'_> {}
}

impl<F> Map<F> for () {
    type Output = ();
    fn map(self, _f: &mut F) -> Self::Output {}
}

impl<Seed, F> Fold<Seed, F> for () {
    type Output = Seed;
    fn fold(self, seed: Seed, _f: &mut F) -> Self::Output {
        seed
    }
}

impl<V> ForEach<V> for () {
    fn for_each(&self, _visitor: &mut V) {}
}

// Fold impls need telescoping bounds (the accumulator type after element i is
// part of the bound on element i+1), so they are built by an accumulating
// muncher rather than a one-shot expansion.
macro_rules! fold_impls {
    (@munch
        acc = [$acc:ty],
        bounds = [$($b:tt)*],
        rest = [($T1:ident, $i1:tt) $($rest:tt)*],
        all = [$($all:tt)*]
    ) => {
        fold_impls!(@munch
            acc = [<F as FoldStep<$acc, $T1>>::Folded],
            bounds = [$($b)* F: FoldStep<$acc, $T1>,],
            rest = [$($rest)*],
            all = [$($all)*]);
    };
    (@munch
        acc = [$acc:ty],
        bounds = [$($b:tt)*],
        rest = [],
        all = [$(($T:ident, $i:tt))+]
    ) => {
        impl<Seed, F, $($T,)+> Fold<Seed, F> for ($($T,)+)
        where
            $($b)*
        {
            type Output = $acc;

            fn fold(self, seed: Seed, f: &mut F) -> Self::Output {
                let acc = seed;
                $(let acc = f.step(acc, self.$i);)+
                acc
            }
        }
    };
    (($T0:ident, $i0:tt) $(($T:ident, $i:tt))*) => {
        fold_impls!(@munch
            acc = [<F as FoldStep<Seed, $T0>>::Folded],
            bounds = [F: FoldStep<Seed, $T0>,],
            rest = [$(($T, $i))*],
            all = [($T0, $i0) $(($T, $i))*]);
    };
}

macro_rules! tuple_impls {
    ($arity:tt => $(($T:ident, $i:tt)),+) => {
        impl<$($T,)+> Arity for ($($T,)+) {
            const ARITY: usize = $arity;
        }

        impl<$($T,)+> TupleRefs for ($($T,)+) {
            type Refs<'a> = ($(&'a $T,)+) where Self: 'a;

            fn as_refs(&self) -> Self::Refs<'_> {
                ($(&self.$i,)+)
            }
        }

        impl<F, $($T,)+> Map<F> for ($($T,)+)
        where
            $(F: Mapper<$T>,)+
        {
            type Output = ($(<F as Mapper<$T>>::Output,)+);

            fn map(self, f: &mut F) -> Self::Output {
                ($(f.apply(self.$i),)+)
            }
        }

        impl<V, $($T,)+> ForEach<V> for ($($T,)+)
        where
            $(V: Visitor<$T>,)+
        {
            fn for_each(&self, visitor: &mut V) {
                $(visitor.visit($i, &self.$i);)+
            }
        }

        fold_impls!($(($T, $i))+);
    };
}

tuple_impls!(1 => (T1, 0));
tuple_impls!(2 => (T1, 0), (T2, 1));
tuple_impls!(3 => (T1, 0), (T2, 1), (T3, 2));
tuple_impls!(4 => (T1, 0), (T2, 1), (T3, 2), (T4, 3));
tuple_impls!(5 => (T1, 0), (T2, 1), (T3, 2), (T4, 3), (T5, 4));
tuple_impls!(6 => (T1, 0), (T2, 1), (T3, 2), (T4, 3), (T5, 4), (T6, 5));
tuple_impls!(7 => (T1, 0), (T2, 1), (T3, 2), (T4, 3), (T5, 4), (T6, 5), (T7, 6));
tuple_impls!(8 => (T1, 0), (T2, 1), (T3, 2), (T4, 3), (T5, 4), (T6, 5), (T7, 6), (T8, 7));

// One ZipWith impl per (left arity, right arity) pair with right <= left;
// the left-over left-hand elements only appear as unconstrained generics.
macro_rules! zip_with_impls {
    ($([$K:ident $X:ident $i:tt])* ; $($R:ident)*) => {
        impl<F, $($K, $X,)* $($R,)*> ZipWith<($($X,)*), F> for ($($K,)* $($R,)*)
        where
            $(F: Combiner<$K, $X>,)*
        {
            type Output = ($(<F as Combiner<$K, $X>>::Output,)*);

            #[allow(unused_variables)]
            fn zip_with(self, rhs: ($($X,)*), f: &mut F) -> Self::Output {
                ($(f.combine(self.$i, rhs.$i),)*)
            }
        }
    };
}

zip_with_impls!(;);
zip_with_impls!(; K1);
zip_with_impls!([K1 X1 0];);
zip_with_impls!(; K1 K2);
zip_with_impls!([K1 X1 0]; K2);
zip_with_impls!([K1 X1 0] [K2 X2 1];);
zip_with_impls!(; K1 K2 K3);
zip_with_impls!([K1 X1 0]; K2 K3);
zip_with_impls!([K1 X1 0] [K2 X2 1]; K3);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2];);
zip_with_impls!(; K1 K2 K3 K4);
zip_with_impls!([K1 X1 0]; K2 K3 K4);
zip_with_impls!([K1 X1 0] [K2 X2 1]; K3 K4);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2]; K4);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3];);
zip_with_impls!(; K1 K2 K3 K4 K5);
zip_with_impls!([K1 X1 0]; K2 K3 K4 K5);
zip_with_impls!([K1 X1 0] [K2 X2 1]; K3 K4 K5);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2]; K4 K5);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3]; K5);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4];);
zip_with_impls!(; K1 K2 K3 K4 K5 K6);
zip_with_impls!([K1 X1 0]; K2 K3 K4 K5 K6);
zip_with_impls!([K1 X1 0] [K2 X2 1]; K3 K4 K5 K6);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2]; K4 K5 K6);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3]; K5 K6);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4]; K6);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4] [K6 X6 5];);
zip_with_impls!(; K1 K2 K3 K4 K5 K6 K7);
zip_with_impls!([K1 X1 0]; K2 K3 K4 K5 K6 K7);
zip_with_impls!([K1 X1 0] [K2 X2 1]; K3 K4 K5 K6 K7);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2]; K4 K5 K6 K7);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3]; K5 K6 K7);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4]; K6 K7);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4] [K6 X6 5]; K7);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4] [K6 X6 5] [K7 X7 6];);
zip_with_impls!(; K1 K2 K3 K4 K5 K6 K7 K8);
zip_with_impls!([K1 X1 0]; K2 K3 K4 K5 K6 K7 K8);
zip_with_impls!([K1 X1 0] [K2 X2 1]; K3 K4 K5 K6 K7 K8);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2]; K4 K5 K6 K7 K8);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3]; K5 K6 K7 K8);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4]; K6 K7 K8);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4] [K6 X6 5]; K7 K8);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4] [K6 X6 5] [K7 X7 6]; K8);
zip_with_impls!([K1 X1 0] [K2 X2 1] [K3 X3 2] [K4 X4 3] [K5 X5 4] [K6 X6 5] [K7 X7 6] [K8 X8 7];);

#[cfg(test)]
mod tests {
    use super::*;

    struct Product;
    impl Combiner<f64, f64> for Product {
        type Output = f64;
        fn combine(&mut self, l: f64, r: f64) -> f64 {
            l * r
        }
    }
    impl Combiner<i32, i32> for Product {
        type Output = i32;
        fn combine(&mut self, l: i32, r: i32) -> i32 {
            l * r
        }
    }

    struct Accumulate;
    impl FoldStep<f64, f64> for Accumulate {
        type Folded = f64;
        fn step(&mut self, acc: f64, t: f64) -> f64 {
            acc + t
        }
    }
    // promotes the accumulator from i32 to f64 mid-fold
    impl FoldStep<i32, f64> for Accumulate {
        type Folded = f64;
        fn step(&mut self, acc: i32, t: f64) -> f64 {
            f64::from(acc) + t
        }
    }
    impl FoldStep<i32, i32> for Accumulate {
        type Folded = i32;
        fn step(&mut self, acc: i32, t: i32) -> i32 {
            acc + t
        }
    }

    #[test]
    fn arity_matches_tuple_length() {
        assert_eq!(<() as Arity>::ARITY, 0);
        assert_eq!(<(u8,) as Arity>::ARITY, 1);
        assert_eq!(<(u8, f64, &str) as Arity>::ARITY, 3);
        assert_eq!(<(u8, u8, u8, u8, u8, u8, u8, u8) as Arity>::ARITY, 8);
    }

    #[test]
    fn as_refs_aliases_the_original_elements() {
        let t = (1.0_f64, String::from("gain"));
        let refs = t.as_refs();
        assert!(std::ptr::eq(refs.0, &t.0));
        assert!(std::ptr::eq(refs.1, &t.1));
    }

    #[test]
    fn zip_with_combines_pairwise() {
        let mut f = Product;
        assert_eq!((2.0, 3.0).zip_with((10.0, 100.0), &mut f), (20.0, 300.0));
    }

    #[test]
    fn zip_with_drops_extra_left_hand_elements() {
        let mut f = Product;
        assert_eq!((2, 3, 4).zip_with((5,), &mut f), (10,));
        assert_eq!((2, 3, 4).zip_with((), &mut f), ());
    }

    #[test]
    fn zip_with_mixes_element_types() {
        let mut f = Product;
        assert_eq!((2, 0.5).zip_with((3, 8.0), &mut f), (6, 4.0));
    }

    #[test]
    fn fold_is_left_to_right_from_the_seed() {
        struct Trace;
        impl FoldStep<String, &str> for Trace {
            type Folded = String;
            fn step(&mut self, acc: String, t: &str) -> String {
                format!("({acc}+{t})")
            }
        }

        let folded = ("a", "b", "c").fold(String::from("s"), &mut Trace);
        assert_eq!(folded, "(((s+a)+b)+c)");
    }

    #[test]
    fn fold_may_change_accumulator_type() {
        let folded = (1, 0.5, 2.0).fold(0_i32, &mut Accumulate);
        assert_eq!(folded, 3.5);
    }

    #[test]
    fn empty_tuple_folds_to_the_seed() {
        assert_eq!(().fold(42, &mut Accumulate), 42);
    }

    #[test]
    fn map_transforms_every_position() {
        struct Negate;
        impl Mapper<i32> for Negate {
            type Output = i32;
            fn apply(&mut self, e: i32) -> i32 {
                -e
            }
        }
        impl Mapper<f64> for Negate {
            type Output = f64;
            fn apply(&mut self, e: f64) -> f64 {
                -e
            }
        }

        assert_eq!((1, 2.5).map(&mut Negate), (-1, -2.5));
    }

    #[test]
    fn for_each_reports_positions_in_order() {
        struct Log(Vec<String>);
        impl<T: std::fmt::Debug> Visitor<T> for Log {
            fn visit(&mut self, index: usize, element: &T) {
                self.0.push(format!("{index}:{element:?}"));
            }
        }

        let mut log = Log(Vec::new());
        (7, "k", 1.5).for_each(&mut log);
        assert_eq!(log.0, ["0:7", "1:\"k\"", "2:1.5"]);
    }

    #[test]
    fn pick_reorders_and_repeats() {
        let t = (10, 20, 30);
        assert_eq!(pick!(t => 2, 0, 0, 1), (30, 10, 10, 20));
    }
}
