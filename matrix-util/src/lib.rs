//! Array helpers shared by the posterior analysis crates
//!
//! Buffered (gzip-aware) text I/O and `ndarray` traits for
//! elementwise transforms, tensor flattening and column-wise
//! statistics over (draws x observations) matrices.

/// Open, read and write plain or gzipped files
pub mod common_io;

/// Trait definitions implemented for `ndarray` containers
pub mod traits;

/// Elementwise transforms and tensor reshaping
pub mod ndarray_util;

/// Column-wise sums, masking and log-sum-exp
pub mod ndarray_stat;
