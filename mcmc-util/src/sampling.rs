use crate::error::{PosteriorError, Result};
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, InverseGaussian};

/// Draw `size` shifted Wald variates, `theta + IG(alpha/gamma, alpha^2)`,
/// keeping only draws below `upper`
///
/// * `gamma` - drift rate (> 0)
/// * `alpha` - boundary separation (> 0)
/// * `theta` - non-decision time (shift)
/// * `upper` - truncation point; `None` means no truncation
/// * `size` - number of draws to keep
/// * `rng` - random number generator
pub fn shifted_wald_rng<R: Rng + ?Sized>(
    gamma: f64,
    alpha: f64,
    theta: f64,
    upper: Option<f64>,
    size: usize,
    rng: &mut R,
) -> Result<Array1<f64>> {
    if !(gamma > 0.0 && alpha > 0.0) {
        return Err(PosteriorError::invalid(format!(
            "shifted Wald needs positive drift and boundary, got gamma = {}, alpha = {}",
            gamma, alpha
        )));
    }

    let upper = upper.unwrap_or(f64::INFINITY);
    if upper <= theta {
        return Err(PosteriorError::invalid(format!(
            "upper bound {} must exceed the shift {}",
            upper, theta
        )));
    }

    let pdf = InverseGaussian::new(alpha / gamma, alpha * alpha)
        .map_err(|e| PosteriorError::invalid(format!("inverse Gaussian: {}", e)))?;

    let mut draws = Vec::with_capacity(size);
    while draws.len() < size {
        let rt = theta + pdf.sample(rng);
        if rt < upper {
            draws.push(rt);
        }
    }
    Ok(Array1::from_vec(draws))
}
