//! Hard-to-misuse building blocks for linear and affine feedback laws.
//!
//! This crate provides the small algebraic core that feedback controllers
//! keep reinventing: weighted sums of heterogeneously-typed terms
//! ([`LinearEquation`]), affine maps with optional offsets and opt-in
//! validity checks ([`LinearModel`]), and the proportional-derivative law
//! ([`Pd`]). Everything stays generic over the coefficient types, so the
//! same primitives work for plain `f64` gains, [`nalgebra`] matrices, and
//! unit-carrying quantities (eg, [`uom`](https://docs.rs/uom)) alike, and
//! the compiler rejects dimensionally-nonsensical pairings instead of
//! letting them produce garbage at runtime.
//!
//! # Equations
//!
//! A [`LinearEquation`] is a constant term plus a tuple of coefficients;
//! solving it against a tuple of unknowns computes the weighted sum term by
//! term, left to right:
//!
//! ```
//! use linear_feedback::equation;
//!
//! let distance = equation!(1.0; 2.0, 3.0);
//! assert_eq!(distance.solve((10.0, 100.0)), 1.0 + 2.0 * 10.0 + 3.0 * 100.0);
//!
//! // solving against fewer unknowns uses a prefix of the coefficients
//! assert_eq!(distance.solve((10.0,)), 21.0);
//! ```
//!
//! Because every term keeps its own type, the tuples may freely mix types as
//! long as the products and sums compose. Terms that should not participate
//! are [`Ignored`]:
//!
//! ```
//! use linear_feedback::{equation, Ignored};
//!
//! let partial = equation!(1.0; Ignored, 3.0);
//! assert_eq!(partial.solve((10.0, 100.0)), 301.0);
//! ```
//!
//! More unknowns than coefficients is a compile-time error:
//!
//! ```compile_fail
//! use linear_feedback::equation;
//!
//! let eq = equation!(1.0; 2.0);
//! eq.solve((1.0, 2.0));
//! ```
//!
//! # Models
//!
//! A [`LinearModel`] is the matrix-shaped sibling: one coefficient value
//! multiplied against the whole input, optionally biased by an offset, with
//! [`IsValid`]/[`Accepts`] hooks that let coefficient types verify the model
//! before solving:
//!
//! ```
//! use linear_feedback::LinearModel;
//!
//! let affine = LinearModel::with_offset(2, 3);
//! assert_eq!(affine.solve(5), 13);
//! assert_eq!(affine.try_solve(5), Some(13));
//! ```
//!
//! Models over `nalgebra` gains matrices check their dimensions through
//! those hooks, and the [`config`] module deserializes such models straight
//! from parameter files.
//!
//! # Feedback laws
//!
//! [`Pd`] is the fixed two-term law `u = kp*x + kd*dx`:
//!
//! ```
//! use linear_feedback::Pd;
//!
//! let law = Pd::new(2.0, 0.5);
//! assert_eq!(law.solve(10.0, 4.0), 22.0);
//! ```
//!
//! # Ownership
//!
//! All of these types store exactly what you construct them with: owned
//! values, references, or a mix (`equation!(&k0; &k1, 2.0)` borrows two
//! terms and owns one). Solving consumes the equation/model/law value, which
//! is free for `Copy` coefficients; non-`Copy` ones are solved repeatedly
//! through `by_ref()`, which borrows every term in place.
//!
//! # Features
//!
//! - `serde` *(default)*: `Serialize`/`Deserialize` for every data-carrying
//!   type, and the [`config`] module's file formats.
//! - `approx` *(default)*: `AbsDiffEq`/`RelativeEq` for the data-carrying
//!   types so tests can compare laws approximately.

pub mod config;
pub mod tuples;

mod equation;
mod model;
mod pd;

pub use equation::{CoefficientLeft, CoefficientRight, Ignored, LinearEquation, SumTerms};
pub use model::{Accepts, IsValid, LinearModel, NoOffset, OffsetState, WithOffset};
pub use pd::{Pd, PdController};
