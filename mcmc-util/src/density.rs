use ndarray::{Array, ArrayBase, Data, Dimension};
use special::Gamma;
use std::f64::consts::PI;

/// Elementwise log density of `N(mu, sd^2)`
///
/// $$\ln p(x) = -\frac{1}{2}\ln 2\pi - \frac{1}{2}\ln \sigma^2 - \frac{(x-\mu)^2}{2\sigma^2}$$
pub fn normal_lpdf<S, D>(x: &ArrayBase<S, D>, mu: f64, sd: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let var = sd * sd;
    let log_norm = -0.5 * (2.0 * PI).ln() - 0.5 * var.ln();
    x.mapv(|x| log_norm - 0.5 * (x - mu).powi(2) / var)
}

/// Convert a gamma distribution's `(mode, sd)` to `(shape, rate)`
///
/// Solves `mode = (shape - 1) / rate` and `sd = sqrt(shape) / rate`
/// for the root with `shape >= 1`.
pub fn to_shape_rate(mode: f64, sd: f64) -> (f64, f64) {
    let rate = (mode + (mode * mode + 4.0 * sd * sd).sqrt()) / (2.0 * sd * sd);
    let shape = 1.0 + mode * rate;
    (shape, rate)
}

/// Elementwise density of the (shape, rate)-parameterized gamma
///
/// $$p(x) = \frac{\beta^\alpha}{\Gamma(\alpha)} x^{\alpha-1} e^{-\beta x}$$
pub fn gamma_pdf<S, D>(x: &ArrayBase<S, D>, shape: f64, rate: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let norm = rate.powf(shape) / Gamma::gamma(shape);
    x.mapv(|x| norm * x.powf(shape - 1.0) * (-rate * x).exp())
}

/// Elementwise density of the shifted Wald distribution, the first
/// passage time of a diffusion with drift `gamma` to a boundary
/// `alpha`, shifted by a non-decision time `theta`
///
/// Zero wherever `x <= theta`.
pub fn shifted_wald_pdf<S, D>(x: &ArrayBase<S, D>, gamma: f64, alpha: f64, theta: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    x.mapv(|x| {
        let t = x - theta;
        if t > 0.0 {
            let scale = alpha / (2.0 * PI * t.powi(3)).sqrt();
            scale * (-(alpha - gamma * t).powi(2) / (2.0 * t)).exp()
        } else {
            0.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn normal_lpdf_at_the_mean() {
        let lp = normal_lpdf(&array![0.0, 1.0], 0.0, 1.0);
        assert_abs_diff_eq!(lp[0], -0.5 * (2.0 * PI).ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(lp[1], lp[0] - 0.5, epsilon = 1e-12);

        let lp2 = normal_lpdf(&array![3.0], 3.0, 2.0);
        assert_abs_diff_eq!(lp2[0], -0.5 * (2.0 * PI).ln() - 2_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn shape_rate_recovers_mode_and_sd() {
        let (mode, sd) = (2.5, 1.2);
        let (shape, rate) = to_shape_rate(mode, sd);
        assert_abs_diff_eq!((shape - 1.0) / rate, mode, epsilon = 1e-10);
        assert_abs_diff_eq!(shape.sqrt() / rate, sd, epsilon = 1e-10);
    }

    #[test]
    fn gamma_pdf_with_unit_shape_is_exponential() {
        let xx = array![0.0, 0.5, 3.0];
        let pp = gamma_pdf(&xx, 1.0, 2.0);
        for (p, x) in pp.iter().zip(xx.iter()) {
            assert_abs_diff_eq!(*p, 2.0 * (-2.0 * x).exp(), epsilon = 1e-12);
        }

        // Gamma(3, 1) at x = 2: 2^2 e^{-2} / 2!
        let p = gamma_pdf(&array![2.0], 3.0, 1.0);
        assert_abs_diff_eq!(p[0], 2.0 * (-2.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn shifted_wald_matches_inverse_gaussian() {
        let (gamma, alpha, theta) = (1.5, 1.2, 0.3);
        let mu = alpha / gamma;
        let lambda = alpha * alpha;

        let xx = array![0.1, 0.3, 0.5, 1.0, 2.5];
        let pp = shifted_wald_pdf(&xx, gamma, alpha, theta);

        assert_eq!(pp[0], 0.0);
        assert_eq!(pp[1], 0.0);
        for (p, x) in pp.iter().zip(xx.iter()).skip(2) {
            let t = x - theta;
            let ig = (lambda / (2.0 * PI * t.powi(3))).sqrt()
                * (-lambda * (t - mu).powi(2) / (2.0 * mu * mu * t)).exp();
            assert_abs_diff_eq!(*p, ig, epsilon = 1e-12);
        }
    }

    #[test]
    fn shifted_wald_integrates_to_one() {
        let dx = 1e-3;
        let xx = Array1::from_shape_fn(60_000, |i| i as f64 * dx);
        let pp = shifted_wald_pdf(&xx, 1.0, 1.0, 0.2);
        let total = pp.sum() * dx;
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-3);
    }
}
