//! Posterior summaries and Bayesian model comparison
//!
//! Reads posterior draws produced by an external fitting tool,
//! extracts per-observation log-likelihoods and compares two models
//! on the deviance scale with WAIC or PSIS-LOO.
//!
//! # References
//!
//! Vehtari, Gelman & Gabry (2017). "Practical Bayesian model
//! evaluation using leave-one-out cross-validation and WAIC."
//! Statistics and Computing 27, 1413-1432.

/// Error kinds shared by every routine in this crate
pub mod error;

/// Densities and reparameterizations
pub mod density;

/// Random variate generators
pub mod sampling;

/// Highest density intervals and per-element summaries
pub mod hdi;

/// Persisted posterior draws and where to find them
pub mod fit_io;

/// Log-likelihood extraction, flattening and masking
pub mod log_lik;

/// Widely applicable information criterion
pub mod waic;

/// Pareto-smoothed importance sampling leave-one-out
pub mod psis;

/// Two-model comparison on the deviance scale
pub mod comparison;

pub use comparison::{compare_models, ComparisonConfig, Metric, ModelComparison};
pub use error::{PosteriorError, Result};
pub use fit_io::{FitSource, FitStore, PosteriorFit};
pub use log_lik::{extract_log_likelihoods, Channel, LogLikelihoods};
pub use waic::{waic, waic_log_sum_exp, WaicFormula};
