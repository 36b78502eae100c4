//! Building gains models from configuration files.
//!
//! Controller gains tend to live in parameter files, not in code: a matrix of
//! gains, its shape, and optionally an offset vector. The types here are the
//! deserializable mirror of that layout, and [`FeedbackConfig::build`] turns
//! a parsed file into a ready-to-solve [`LinearModel`].
//!
//! With the `serde` feature (on by default) every type here derives
//! `Deserialize`/`Serialize`, so loading is one `serde_yaml`/`serde_json`
//! call away:
//!
//! ```
//! # #[cfg(feature = "serde")] {
//! use linear_feedback::config::FeedbackConfig;
//! use nalgebra::DVector;
//!
//! let config: FeedbackConfig = serde_yaml::from_str(
//!     "
//!     gains:
//!       shape: { rows: 2, cols: 3 }
//!       values: [0.0, 1.0, 0.0, 1.0, 0.0, 1.0]
//!     offset:
//!       size: 2
//!       values: [10.0, 20.0]
//!     ",
//! )
//! .unwrap();
//!
//! let model = config.build().unwrap();
//! let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
//! assert_eq!(
//!     model.by_ref().solve(&x),
//!     DVector::from_vec(vec![12.0, 24.0]),
//! );
//! # }
//! ```

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{LinearModel, WithOffset};

/// The model [`FeedbackConfig::build`] produces.
pub type GainsModel = LinearModel<DMatrix<f64>, WithOffset<DVector<f64>>>;

/// Why a configuration could not be turned into a [`GainsModel`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The gains matrix declared `rows * cols` entries but `values` held a
    /// different (non-zero) number.
    #[error("gains declare a {rows}x{cols} matrix but carry {got} values")]
    GainsSizeMismatch {
        rows: usize,
        cols: usize,
        got: usize,
    },

    /// The offset vector declared `size` entries but `values` held a
    /// different (non-zero) number.
    #[error("offset declares {size} entries but carries {got} values")]
    OffsetSizeMismatch { size: usize, got: usize },

    /// The offset's length does not match the gains matrix's row count.
    #[error("offset of length {offset} cannot bias a gains matrix with {rows} rows")]
    IncompatibleOffset { rows: usize, offset: usize },
}

/// Row and column counts of a configured gains matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

/// A gains matrix as written in a parameter file: a shape plus row-major
/// values.
///
/// `values` may be omitted (or left empty) to get an all-zero matrix of the
/// declared shape; any other length than `rows * cols` is a
/// [`ConfigError::GainsSizeMismatch`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GainsParam {
    pub shape: Shape,

    #[cfg_attr(feature = "serde", serde(default))]
    pub values: Vec<f64>,
}

impl GainsParam {
    /// Realizes the declared matrix, reading `values` in row-major order.
    pub fn to_matrix(&self) -> Result<DMatrix<f64>, ConfigError> {
        let Shape { rows, cols } = self.shape;
        if self.values.is_empty() {
            return Ok(DMatrix::zeros(rows, cols));
        }
        if self.values.len() != rows * cols {
            return Err(ConfigError::GainsSizeMismatch {
                rows,
                cols,
                got: self.values.len(),
            });
        }
        Ok(DMatrix::from_row_slice(rows, cols, &self.values))
    }
}

/// An offset vector as written in a parameter file.
///
/// `values` may be omitted (or left empty) to get a zero vector of the
/// declared size; any other length than `size` is a
/// [`ConfigError::OffsetSizeMismatch`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OffsetParam {
    pub size: usize,

    #[cfg_attr(feature = "serde", serde(default))]
    pub values: Vec<f64>,
}

impl OffsetParam {
    /// Realizes the declared vector.
    pub fn to_vector(&self) -> Result<DVector<f64>, ConfigError> {
        if self.values.is_empty() {
            return Ok(DVector::zeros(self.size));
        }
        if self.values.len() != self.size {
            return Err(ConfigError::OffsetSizeMismatch {
                size: self.size,
                got: self.values.len(),
            });
        }
        Ok(DVector::from_vec(self.values.clone()))
    }
}

/// A whole feedback-law configuration: gains, optionally an offset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeedbackConfig {
    pub gains: GainsParam,

    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: Option<OffsetParam>,
}

impl FeedbackConfig {
    /// Realizes the configured [`GainsModel`].
    ///
    /// An absent `offset` section builds a zero offset of the gains' row
    /// count, so the resulting model is always the affine shape and always
    /// passes [`LinearModel::is_valid`].
    pub fn build(&self) -> Result<GainsModel, ConfigError> {
        let gains = self.gains.to_matrix()?;
        let offset = match &self.offset {
            Some(param) => param.to_vector()?,
            None => DVector::zeros(gains.nrows()),
        };
        if offset.len() != gains.nrows() {
            return Err(ConfigError::IncompatibleOffset {
                rows: gains.nrows(),
                offset: offset.len(),
            });
        }
        Ok(LinearModel::with_offset(gains, offset))
    }
}
