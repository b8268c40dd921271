//! Statistical engine.
//!
//! Pure functions over extracted numeric columns (and, for the chi-squared
//! test, over raw cells). Nothing here reads or writes the dataset store.
//!
//! Every function fails closed: inputs that would make the math undefined
//! (an empty column, a zero range, a zero standard deviation, an all-zero
//! column, an intermediate result beyond the range of `f64`) return a typed
//! [`ProcessingError`](crate::error::ProcessingError) instead of emitting
//! `NaN` or infinity.
//!
//! - [`descriptive`]: mean, population variance, median, quartiles, mode
//! - [`normalization`]: min-max, z-score and decimal scaling
//! - [`discretization`]: equal-width binning
//! - [`chi_squared`]: chi-squared independence statistic
//! - [`correlation`]: covariance and Pearson correlation

pub mod chi_squared;
pub mod correlation;
pub mod descriptive;
pub mod discretization;
pub mod normalization;

pub use chi_squared::{chi_squared_independence, chi_squared_numeric};
pub use correlation::{pearson_correlation, population_covariance};
pub use descriptive::{mean, median, mode, quantile, variance};
pub use discretization::equal_width_binning;
pub use normalization::{decimal_scale, min_max_normalize, normalize, z_score_normalize};
