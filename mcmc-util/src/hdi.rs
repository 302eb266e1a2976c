use crate::error::{PosteriorError, Result};
use matrix_util::traits::FlattenOps;
use ndarray::prelude::*;
use ndarray::{Data, Dimension};

/// Highest density interval of a sample, estimated as the shortest
/// interval containing `cred_mass` of the sorted draws
///
/// See Kruschke, "Doing Bayesian Data Analysis" (2nd ed.), ch. 25.
///
/// * `samples` - representative draws from a distribution
/// * `cred_mass` - probability mass inside the interval, in `(0, 1)`
///
/// Returns `(lower, upper)`. Ties in width go to the leftmost interval.
pub fn hdi<S>(samples: &ArrayBase<S, Ix1>, cred_mass: f64) -> Result<(f64, f64)>
where
    S: Data<Elem = f64>,
{
    if !(cred_mass > 0.0 && cred_mass < 1.0) {
        return Err(PosteriorError::invalid(format!(
            "credible mass must be in (0, 1), got {}",
            cred_mass
        )));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let width = (cred_mass * n as f64).ceil() as usize;
    let n_cis = n.saturating_sub(width);
    if n_cis == 0 {
        return Err(PosteriorError::invalid(format!(
            "{} draws are too few for a {} interval",
            n, cred_mass
        )));
    }

    let mut best = 0;
    for i in 1..n_cis {
        if sorted[i + width] - sorted[i] < sorted[best + width] - sorted[best] {
            best = i;
        }
    }
    Ok((sorted[best], sorted[best + width]))
}

/// Per-element posterior summary over the draw axis
#[derive(Debug, Clone)]
pub struct DrawSummary {
    pub mean: ArrayD<f64>,
    pub sd: ArrayD<f64>,
    pub hdi_lb: ArrayD<f64>,
    pub hdi_ub: ArrayD<f64>,
}

impl DrawSummary {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// One line per element, `name[i,j,..] mean sd hdi_lb hdi_ub`
    /// separated by `sep`, in row-major element order
    pub fn to_string_vec(&self, name: &str, sep: &str) -> Vec<Box<str>> {
        self.mean
            .indexed_iter()
            .zip(self.sd.iter())
            .zip(self.hdi_lb.iter().zip(self.hdi_ub.iter()))
            .map(|(((idx, mu), sig), (lb, ub))| {
                let elem = if idx.ndim() == 0 {
                    name.to_string()
                } else {
                    let idx: Vec<String> = idx.slice().iter().map(|i| i.to_string()).collect();
                    format!("{}[{}]", name, idx.join(","))
                };
                format!(
                    "{}{}{}{}{}{}{}{}{}",
                    elem, sep, mu, sep, sig, sep, lb, sep, ub
                )
                .into_boxed_str()
            })
            .collect()
    }
}

/// Summarize every element of a draws array whose first axis indexes
/// posterior draws
///
/// * `draws` - array of shape `(n_draws, ...)`
/// * `cred_mass` - mass of the highest density intervals
pub fn summarize_draws(draws: &ArrayD<f64>, cred_mass: f64) -> Result<DrawSummary> {
    let shape = draws.shape();
    if shape.is_empty() || shape[0] == 0 {
        return Err(PosteriorError::shape("no posterior draws to summarize"));
    }
    let elem_shape = IxDyn(&shape[1..]);

    let mat = draws
        .flatten_trailing_axes()
        .map_err(|e| PosteriorError::shape(e.to_string()))?;

    let mean = mat
        .mean_axis(Axis(0))
        .ok_or_else(|| PosteriorError::shape("no posterior draws to summarize"))?;
    let sd = mat.std_axis(Axis(0), 0.0);

    let mut hdi_lb = Array1::zeros(mat.ncols());
    let mut hdi_ub = Array1::zeros(mat.ncols());
    for (j, x_j) in mat.axis_iter(Axis(1)).enumerate() {
        let (lb, ub) = hdi(&x_j, cred_mass)?;
        hdi_lb[j] = lb;
        hdi_ub[j] = ub;
    }

    let reshape = |x: Array1<f64>| -> Result<ArrayD<f64>> {
        x.into_shape_with_order(elem_shape.clone())
            .map_err(|e| PosteriorError::shape(e.to_string()))
    };

    Ok(DrawSummary {
        mean: reshape(mean)?,
        sd: reshape(sd)?,
        hdi_lb: reshape(hdi_lb)?,
        hdi_ub: reshape(hdi_ub)?,
    })
}
