//! Pareto-smoothed importance sampling leave-one-out cross-validation
//!
//! Vehtari, Simpson, Gelman, Yao & Gabry (2024). "Pareto smoothed
//! importance sampling." JMLR 25(72).
//!
//! Zhang & Stephens (2009). "A new and efficient estimation method for
//! the generalized Pareto distribution." Technometrics 51(3).

use crate::error::{PosteriorError, Result};
use matrix_util::ndarray_stat::log_sum_exp;
use ndarray::prelude::*;
use rayon::prelude::*;

/// Shape estimates above this make the importance weights unreliable
pub const PARETO_K_THRESHOLD: f64 = 0.7;

/// Tail samples needed to fit a generalized Pareto distribution
const MIN_TAIL_LEN: usize = 5;

const PRIOR_BS: f64 = 3.0;
const PRIOR_K: f64 = 10.0;

/// Zhang-Stephens grid has `GRID_BASE + floor(sqrt(n))` points
const GRID_BASE: usize = 30;

pub struct PsisLoo {
    /// Sum of the pointwise estimates
    pub elpd_loo: f64,
    /// One leave-one-out elpd per observation
    pub pointwise: Array1<f64>,
    /// Estimated Pareto shape per observation (`inf` if the tail was
    /// too short to fit)
    pub pareto_k: Array1<f64>,
}

impl PsisLoo {
    /// Number of observations with `k` above [`PARETO_K_THRESHOLD`]
    pub fn num_bad_k(&self) -> usize {
        self.pareto_k
            .iter()
            .filter(|&&k| k > PARETO_K_THRESHOLD)
            .count()
    }
}

/// PSIS-LOO of a (draws x observations) log-likelihood matrix
pub fn psis_loo(log_lik: &Array2<f64>) -> Result<PsisLoo> {
    let (nsamp, nobs) = log_lik.dim();
    if nsamp < 2 {
        return Err(PosteriorError::invalid(format!(
            "PSIS-LOO needs at least two draws, got {}",
            nsamp
        )));
    }

    let loo_k: Vec<(f64, f64)> = (0..nobs)
        .into_par_iter()
        .map(|i| {
            let ll_i = log_lik.column(i);
            let raw_lw: Vec<f64> = ll_i.iter().map(|&ll| -ll).collect();
            let (lw, k) = pareto_smoothed_log_weights(raw_lw);
            let loo_i = log_sum_exp(lw.iter().zip(ll_i.iter()).map(|(w, ll)| w + ll));
            (loo_i, k)
        })
        .collect();

    let pointwise: Array1<f64> = loo_k.iter().map(|&(loo, _)| loo).collect();
    let pareto_k: Array1<f64> = loo_k.iter().map(|&(_, k)| k).collect();

    Ok(PsisLoo {
        elpd_loo: pointwise.sum(),
        pointwise,
        pareto_k,
    })
}

/// Smooth the upper tail of one observation's importance log-weights
///
/// Returns the normalized (log-sum-exp zero) log-weights and the
/// Pareto shape estimate.
pub fn pareto_smoothed_log_weights(lw: Vec<f64>) -> (Vec<f64>, f64) {
    let (mut lw, k) = smooth_tail(lw);
    if !lw.is_empty() {
        let lse = log_sum_exp(lw.iter().copied());
        lw.iter_mut().for_each(|x| *x -= lse);
    }
    (lw, k)
}

/// Shift log-weights by their max and replace the largest ones by the
/// order statistics of a fitted generalized Pareto; nothing ends up
/// above the raw max (zero after the shift)
fn smooth_tail(mut lw: Vec<f64>) -> (Vec<f64>, f64) {
    let n = lw.len();
    if n == 0 {
        return (lw, f64::INFINITY);
    }

    let max_lw = lw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    lw.iter_mut().for_each(|x| *x -= max_lw);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| lw[a].total_cmp(&lw[b]));

    let tail_len = (0.2 * n as f64).min(3.0 * (n as f64).sqrt()).ceil() as usize;
    let cutoff_at = n.saturating_sub(tail_len + 1);
    let cutoff = lw[order[cutoff_at]].max(f64::MIN_POSITIVE.ln());
    let exp_cutoff = cutoff.exp();

    let tail: Vec<usize> = order
        .iter()
        .copied()
        .filter(|&j| lw[j] > cutoff)
        .collect();

    if tail.len() < MIN_TAIL_LEN {
        return (lw, f64::INFINITY);
    }

    let excess: Vec<f64> = tail.iter().map(|&j| lw[j].exp() - exp_cutoff).collect();
    let (k, sigma) = gpd_fit(&excess);

    let n_tail = tail.len() as f64;
    for (r, &j) in tail.iter().enumerate() {
        let p = (r as f64 + 0.5) / n_tail;
        lw[j] = (gpd_inv(p, k, sigma) + exp_cutoff).ln();
    }
    lw.iter_mut().for_each(|x| *x = x.min(0.0));
    (lw, k)
}

/// Empirical Bayes estimate of the generalized Pareto `(k, sigma)`
/// from exceedances sorted in ascending order, with a weakly
/// informative prior shrinking `k` towards 0.5
pub fn gpd_fit(x: &[f64]) -> (f64, f64) {
    let n = x.len();
    let nf = n as f64;
    let m = GRID_BASE + nf.sqrt().floor() as usize;

    let x_quart = x[((nf / 4.0 + 0.5) as usize).max(1) - 1];
    let x_max = x[n - 1];

    let mean_log1p = |b: f64| x.iter().map(|&xi| (-b * xi).ln_1p()).sum::<f64>() / nf;

    let bs: Vec<f64> = (1..=m)
        .map(|j| {
            let shrink = 1.0 - (m as f64 / (j as f64 - 0.5)).sqrt();
            1.0 / x_max + shrink / (PRIOR_BS * x_quart)
        })
        .collect();

    // profile log-likelihood of each grid point
    let prof: Vec<f64> = bs
        .iter()
        .map(|&b| {
            let k = mean_log1p(b);
            nf * ((-b / k).ln() - k - 1.0)
        })
        .collect();

    // posterior weights, dropping the negligible ones
    let (bs, w): (Vec<f64>, Vec<f64>) = prof
        .iter()
        .map(|&li| 1.0 / prof.iter().map(|&lj| (lj - li).exp()).sum::<f64>())
        .zip(bs)
        .filter(|&(w, _)| w >= 10.0 * f64::EPSILON)
        .map(|(w, b)| (b, w))
        .unzip();

    let wsum: f64 = w.iter().sum();
    let b: f64 = bs.iter().zip(w.iter()).map(|(b, w)| b * w).sum::<f64>() / wsum;

    let k = mean_log1p(b);
    let sigma = -k / b;

    let k = k * nf / (nf + PRIOR_K) + PRIOR_K * 0.5 / (nf + PRIOR_K);
    (k, sigma)
}

/// Quantile function of the generalized Pareto distribution with
/// location zero
pub fn gpd_inv(p: f64, k: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return 0.0;
    }
    if p == 1.0 {
        return if k >= 0.0 { f64::INFINITY } else { -sigma / k };
    }
    if k.abs() < f64::EPSILON {
        -(-p).ln_1p() * sigma
    } else {
        (-k * (-p).ln_1p()).exp_m1() / k * sigma
    }
}
