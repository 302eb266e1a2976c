use crate::error::{PosteriorError, Result};
use crate::fit_io::FitSource;
use crate::log_lik::{extract_log_likelihoods, Channel};
use crate::psis::{psis_loo, PARETO_K_THRESHOLD};
use crate::waic::WaicFormula;
use log::{info, warn};
use ndarray::prelude::*;
use std::str::FromStr;

/// Pointwise elpd estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Waic,
    Loo,
}

impl FromStr for Metric {
    type Err = PosteriorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "waic" => Ok(Metric::Waic),
            "loo" => Ok(Metric::Loo),
            _ => Err(PosteriorError::invalid(format!(
                "metric must be \"waic\" or \"loo\", got \"{}\"",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Waic => write!(f, "WAIC"),
            Metric::Loo => write!(f, "LOO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonConfig {
    pub metric: Metric,
    pub channel: Channel,
    pub waic_formula: WaicFormula,
    pub verbose: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Waic,
            channel: Channel::Both,
            waic_formula: WaicFormula::Literal,
            verbose: false,
        }
    }
}

/// Two models on the deviance scale, `-2 * elpd`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelComparison {
    pub metric: Metric,
    pub deviance_a: f64,
    pub deviance_b: f64,
    /// Standard error of `deviance_a - deviance_b`
    pub standard_error: f64,
}

impl ModelComparison {
    pub fn difference(&self) -> f64 {
        self.deviance_a - self.deviance_b
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.deviance_a, self.deviance_b, self.standard_error)
    }

    pub fn report(&self) -> Vec<Box<str>> {
        vec![
            "Model comparison".into(),
            "----------------".into(),
            format!("{}[1] = {:.0}", self.metric, self.deviance_a).into(),
            format!("{}[2] = {:.0}", self.metric, self.deviance_b).into(),
            format!("Diff\t= {:.2} ({:.2})", self.difference(), self.standard_error).into(),
        ]
    }
}

impl std::fmt::Display for ModelComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.report().join("\n"))
    }
}

/// Compare two models by their summed pointwise deviance
///
/// Both models must score the same observations in the same order.
///
/// * `source` - where fits are stored
/// * `model_a` - first model name
/// * `model_b` - second model name
/// * `config` - metric, channel and WAIC formula
pub fn compare_models<F>(
    source: &F,
    model_a: &str,
    model_b: &str,
    config: &ComparisonConfig,
) -> Result<ModelComparison>
where
    F: FitSource + ?Sized,
{
    let dev_a = pointwise_deviance(source, model_a, config)?;
    let dev_b = pointwise_deviance(source, model_b, config)?;

    let ret = compare_pointwise_deviance(&dev_a, &dev_b, config.metric)?;

    if config.verbose {
        for line in ret.report() {
            info!("{}", line);
        }
    }
    Ok(ret)
}

/// `-2` times the pointwise elpd of one model
pub fn pointwise_deviance<F>(source: &F, model: &str, config: &ComparisonConfig) -> Result<Array1<f64>>
where
    F: FitSource + ?Sized,
{
    let log_lik = extract_log_likelihoods(source, model, config.channel)?.select(config.channel)?;
    Ok(pointwise_elpd(&log_lik, config.metric, config.waic_formula, model)? * -2.0)
}

/// Pointwise elpd of a (draws x observations) log-likelihood matrix
pub fn pointwise_elpd(
    log_lik: &Array2<f64>,
    metric: Metric,
    waic_formula: WaicFormula,
    model: &str,
) -> Result<Array1<f64>> {
    match metric {
        Metric::Waic => Ok(waic_formula.pointwise(log_lik)),
        Metric::Loo => {
            let loo = psis_loo(log_lik)?;
            let nbad = loo.num_bad_k();
            if nbad > 0 {
                warn!(
                    "{}: {} of {} observations with Pareto k > {}",
                    model,
                    nbad,
                    loo.pareto_k.len(),
                    PARETO_K_THRESHOLD
                );
            }
            Ok(loo.pointwise)
        }
    }
}

/// Totals of two aligned pointwise deviance arrays and the standard
/// error of their paired difference, `sqrt(n * Var(a - b))`
pub fn compare_pointwise_deviance(
    dev_a: &Array1<f64>,
    dev_b: &Array1<f64>,
    metric: Metric,
) -> Result<ModelComparison> {
    if dev_a.len() != dev_b.len() {
        return Err(PosteriorError::shape(format!(
            "models score {} and {} observations",
            dev_a.len(),
            dev_b.len()
        )));
    }

    let diff = dev_b - dev_a;
    let nobs = diff.len() as f64;
    let standard_error = (nobs * diff.var(0.0)).sqrt();

    Ok(ModelComparison {
        metric,
        deviance_a: dev_a.sum(),
        deviance_b: dev_b.sum(),
        standard_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn standard_error_of_paired_difference() -> Result<()> {
        let a = array![1.0, 2.0, 3.0, 4.0];
        let b = array![1.0, 3.0, 3.0, 6.0];
        let ret = compare_pointwise_deviance(&a, &b, Metric::Waic)?;

        // diff = [0, 1, 0, 2]; mean 0.75; population var 0.6875
        assert_abs_diff_eq!(ret.standard_error, (4.0_f64 * 0.6875).sqrt(), epsilon = 1e-12);
        assert_eq!(ret.as_tuple().0, 10.0);
        assert_eq!(ret.as_tuple().1, 13.0);
        assert_eq!(ret.difference(), -3.0);
        Ok(())
    }

    #[test]
    fn misaligned_models() {
        let a = array![1.0, 2.0];
        let b = array![1.0, 2.0, 3.0];
        assert!(matches!(
            compare_pointwise_deviance(&a, &b, Metric::Loo),
            Err(PosteriorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn loo_scores_observations_with_large_k() -> Result<()> {
        // column 0: raw importance weights on a Pareto(k = 1) tail
        let ll = Array2::from_shape_fn((200, 2), |(s, i)| {
            if i == 0 {
                (1.0 - (s as f64 + 0.5) / 200.0).ln()
            } else {
                -1.0
            }
        });
        let elpd = pointwise_elpd(&ll, Metric::Loo, WaicFormula::Literal, "heavy")?;
        assert_eq!(elpd.len(), 2);
        assert_abs_diff_eq!(elpd[0], -1.8307702979464597, epsilon = 1e-8);
        assert_abs_diff_eq!(elpd[1], -1.0, epsilon = 1e-10);
        Ok(())
    }

    #[test]
    fn parse_metrics() {
        assert_eq!("WAIC".parse::<Metric>().unwrap(), Metric::Waic);
        assert_eq!("loo".parse::<Metric>().unwrap(), Metric::Loo);
        assert!(matches!(
            "bogus".parse::<Metric>(),
            Err(PosteriorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn report_layout() {
        let ret = ModelComparison {
            metric: Metric::Loo,
            deviance_a: 1234.4,
            deviance_b: 1200.6,
            standard_error: 5.123,
        };
        let lines = ret.report();
        assert_eq!(lines[2].as_ref(), "LOO[1] = 1234");
        assert_eq!(lines[3].as_ref(), "LOO[2] = 1201");
        assert_eq!(lines[4].as_ref(), "Diff\t= 33.80 (5.12)");
        assert_eq!(ret.to_string().lines().count(), 5);
    }
}
