use matrix_util::traits::ColumnOps;
use ndarray::prelude::*;

/// How the log pointwise predictive density is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaicFormula {
    /// `log(mean(exp(ll)))` as written; over/underflows once
    /// log-likelihoods reach several hundred in magnitude
    #[default]
    Literal,
    /// Same quantity through a max-shifted log-sum-exp
    LogSumExp,
}

impl WaicFormula {
    pub fn pointwise(&self, log_lik: &Array2<f64>) -> Array1<f64> {
        match self {
            WaicFormula::Literal => waic(log_lik),
            WaicFormula::LogSumExp => waic_log_sum_exp(log_lik),
        }
    }
}

/// Pointwise WAIC elpd of a (draws x observations) log-likelihood
/// matrix,
///
/// $$\widehat{\textrm{elpd}}_i = \log \frac{1}{S}\sum_s e^{\ell_{si}} - \textrm{Var}_s(\ell_{si})$$
///
/// with the variance over draws divided by `S`. One value per column.
pub fn waic(log_lik: &Array2<f64>) -> Array1<f64> {
    let lppd = log_lik.mapv(f64::exp).mean_axis(Axis(0)).map(|x| x.mapv(f64::ln));
    lppd_minus_penalty(log_lik, lppd)
}

/// [`waic`] with the log pointwise predictive density computed by
/// log-sum-exp, finite for log-likelihoods of any magnitude
pub fn waic_log_sum_exp(log_lik: &Array2<f64>) -> Array1<f64> {
    let lppd = if log_lik.nrows() > 0 {
        Some(log_lik.log_mean_exp_columns())
    } else {
        None
    };
    lppd_minus_penalty(log_lik, lppd)
}

fn lppd_minus_penalty(log_lik: &Array2<f64>, lppd: Option<Array1<f64>>) -> Array1<f64> {
    match lppd {
        Some(lppd) => lppd - log_lik.var_axis(Axis(0), 0.0),
        // no draws: nothing to average over
        None => Array1::from_elem(log_lik.ncols(), f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_draws_have_no_penalty() {
        let ll = array![[-1.0, -2.0], [-1.0, -2.0]];
        let elpd = waic(&ll);
        assert_eq!(elpd.len(), 2);
        assert_abs_diff_eq!(elpd[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(elpd[1], -2.0, epsilon = 1e-12);
    }

    #[test]
    fn penalty_is_population_variance() {
        let ll = array![[-1.0], [-3.0]];
        let lppd = ((-1.0_f64).exp() + (-3.0_f64).exp()).ln() - 2_f64.ln();
        assert_abs_diff_eq!(waic(&ll)[0], lppd - 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(waic_log_sum_exp(&ll)[0], lppd - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn formulas_agree_on_moderate_values() {
        let ll = Array2::from_shape_fn((50, 7), |(s, i)| -0.5 - ((s * 7 + i) % 11) as f64 / 4.0);
        let a = waic(&ll);
        let b = WaicFormula::LogSumExp.pointwise(&ll);
        assert_eq!(a.len(), 7);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-10);
        }
    }

    #[test]
    fn literal_formula_underflows() {
        let ll = array![[-1000.0], [-1001.0]];
        assert_eq!(waic(&ll)[0], f64::NEG_INFINITY);

        let stable = waic_log_sum_exp(&ll)[0];
        assert!(stable.is_finite());
        let expected = -1000.0 + ((1.0 + (-1.0_f64).exp()) / 2.0).ln() - 0.25;
        assert_abs_diff_eq!(stable, expected, epsilon = 1e-9);
    }

    #[test]
    fn empty_matrices() {
        assert_eq!(waic(&Array2::zeros((3, 0))).len(), 0);
        let no_draws = waic(&Array2::zeros((0, 2)));
        assert_eq!(no_draws.len(), 2);
        assert!(no_draws.iter().all(|x| x.is_nan()));
    }
}
