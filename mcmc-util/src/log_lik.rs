use crate::error::{PosteriorError, Result};
use crate::fit_io::{FitSource, PosteriorFit};
use log::info;
use matrix_util::traits::{ColumnOps, FlattenOps};
use ndarray::prelude::*;
use std::str::FromStr;

/// Log-likelihood of the primary (choice) observations
pub const Y_LOG_LIK: &str = "Y_log_lik";

/// Log-likelihood of the secondary (e.g., response time) observations
pub const M_LOG_LIK: &str = "M_log_lik";

/// Which log-likelihood channel(s) to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Y,
    M,
    Both,
}

impl Channel {
    pub fn uses_y(&self) -> bool {
        matches!(self, Channel::Y | Channel::Both)
    }

    pub fn uses_m(&self) -> bool {
        matches!(self, Channel::M | Channel::Both)
    }
}

impl FromStr for Channel {
    type Err = PosteriorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "y" => Ok(Channel::Y),
            "m" => Ok(Channel::M),
            "both" => Ok(Channel::Both),
            _ => Err(PosteriorError::invalid(format!(
                "channel must be \"y\", \"m\" or \"both\", got \"{}\"",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Y => write!(f, "y"),
            Channel::M => write!(f, "m"),
            Channel::Both => write!(f, "both"),
        }
    }
}

/// (draws x observations) log-likelihood matrices; `None` means the
/// channel was not requested
#[derive(Debug, Clone, PartialEq)]
pub struct LogLikelihoods {
    pub y: Option<Array2<f64>>,
    pub m: Option<Array2<f64>>,
}

impl LogLikelihoods {
    /// The matrix a comparison on `channel` runs on. `Both` puts the
    /// `m` observations after the `y` observations.
    pub fn select(&self, channel: Channel) -> Result<Array2<f64>> {
        let not_extracted =
            |name: &str| PosteriorError::invalid(format!("channel {} was not extracted", name));

        match channel {
            Channel::Y => self.y.clone().ok_or_else(|| not_extracted("y")),
            Channel::M => self.m.clone().ok_or_else(|| not_extracted("m")),
            Channel::Both => {
                let y = self.y.as_ref().ok_or_else(|| not_extracted("y"))?;
                let m = self.m.as_ref().ok_or_else(|| not_extracted("m"))?;
                if y.nrows() != m.nrows() {
                    return Err(PosteriorError::shape(format!(
                        "y has {} draws but m has {}",
                        y.nrows(),
                        m.nrows()
                    )));
                }
                y.concat_columns(m)
                    .map_err(|e| PosteriorError::shape(e.to_string()))
            }
        }
    }
}

/// Load a model's fit and pull out the requested log-likelihoods
///
/// * `source` - where fits are stored
/// * `model` - model name
/// * `channel` - `y`, `m` or both
pub fn extract_log_likelihoods<F>(source: &F, model: &str, channel: Channel) -> Result<LogLikelihoods>
where
    F: FitSource + ?Sized,
{
    let fit = source.load_fit(model)?;
    let out = log_likelihoods_of_fit(&fit, channel)?;

    if let Some(y) = out.y.as_ref() {
        info!("{}: y log-likelihood {} x {}", model, y.nrows(), y.ncols());
    }
    if let Some(m) = out.m.as_ref() {
        info!("{}: m log-likelihood {} x {}", model, m.nrows(), m.ncols());
    }
    Ok(out)
}

/// Same as [`extract_log_likelihoods`] on an already loaded fit
///
/// Only the `y` channel drops missing observations; `m` comes back
/// with every observation.
pub fn log_likelihoods_of_fit(fit: &PosteriorFit, channel: Channel) -> Result<LogLikelihoods> {
    let y = if channel.uses_y() {
        let y = flatten_log_lik(fit, Y_LOG_LIK)?;
        Some(drop_missing_observations(&y)?)
    } else {
        None
    };

    let m = if channel.uses_m() {
        Some(flatten_log_lik(fit, M_LOG_LIK)?)
    } else {
        None
    };

    Ok(LogLikelihoods { y, m })
}

/// (draw, subject, block, trial) -> (draw, observation)
fn flatten_log_lik(fit: &PosteriorFit, key: &str) -> Result<Array2<f64>> {
    let tensor = fit.get(key)?;
    if tensor.ndim() != 4 {
        return Err(PosteriorError::shape(format!(
            "{} should be (draw, subject, block, trial), got shape {:?}",
            key,
            tensor.shape()
        )));
    }
    tensor
        .flatten_trailing_axes()
        .map_err(|e| PosteriorError::shape(e.to_string()))
}

/// Flag observations whose log-likelihood sums to exactly zero over
/// all draws, i.e., never assigned by the model
pub fn missing_observations(log_lik: &Array2<f64>) -> Vec<bool> {
    log_lik.column_sums().iter().map(|&s| s == 0.0).collect()
}

fn drop_missing_observations(log_lik: &Array2<f64>) -> Result<Array2<f64>> {
    let keep: Vec<bool> = missing_observations(log_lik)
        .into_iter()
        .map(|missing| !missing)
        .collect();
    log_lik
        .select_columns(&keep)
        .map_err(|e| PosteriorError::shape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// 3 draws, 2 subjects, 1 block, 2 trials; subject 1 trial 1 is
    /// never observed
    fn fit_with_gap() -> PosteriorFit {
        let ll = Array::from_shape_fn(IxDyn(&[3, 2, 1, 2]), |idx| {
            if idx[1] == 1 && idx[3] == 1 {
                0.0
            } else {
                -1.0 - (idx[0] + 2 * idx[1] + idx[3]) as f64
            }
        });
        let mut fit = PosteriorFit::new();
        fit.insert(Y_LOG_LIK, ll.clone());
        fit.insert(M_LOG_LIK, ll);
        fit
    }

    #[test]
    fn channel_selection() -> Result<()> {
        let fit = fit_with_gap();

        let both = log_likelihoods_of_fit(&fit, Channel::Both)?;
        assert!(both.y.is_some() && both.m.is_some());

        let y = log_likelihoods_of_fit(&fit, Channel::Y)?;
        assert!(y.y.is_some() && y.m.is_none());

        let m = log_likelihoods_of_fit(&fit, Channel::M)?;
        assert!(m.y.is_none() && m.m.is_some());
        Ok(())
    }

    #[test]
    fn only_y_is_masked() -> Result<()> {
        let out = log_likelihoods_of_fit(&fit_with_gap(), Channel::Both)?;
        let y = out.y.as_ref().unwrap();
        let m = out.m.as_ref().unwrap();

        assert_eq!(m.dim(), (3, 4));
        assert_eq!(y.dim(), (3, 3));
        // subject-major, then trial
        assert_eq!(y.row(0).to_vec(), vec![-1.0, -2.0, -3.0]);

        let both = out.select(Channel::Both)?;
        assert_eq!(both.dim(), (3, 7));
        assert!(out.select(Channel::Y)?.ncols() == 3);
        Ok(())
    }

    #[test]
    fn select_a_channel_never_extracted() -> Result<()> {
        let out = log_likelihoods_of_fit(&fit_with_gap(), Channel::Y)?;
        assert!(matches!(
            out.select(Channel::Both),
            Err(PosteriorError::InvalidArgument(_))
        ));
        Ok(())
    }

    #[test]
    fn missing_channel_key() {
        let mut fit = PosteriorFit::new();
        fit.insert(Y_LOG_LIK, Array::zeros(IxDyn(&[2, 1, 1, 1])));
        let mut store = HashMap::new();
        store.insert(Box::<str>::from("y_only"), fit);

        assert!(extract_log_likelihoods(&store, "y_only", Channel::Y).is_ok());
        match extract_log_likelihoods(&store, "y_only", Channel::M) {
            Err(PosteriorError::MissingKey { key }) => assert_eq!(key.as_ref(), M_LOG_LIK),
            other => panic!("expected MissingKey, got {:?}", other),
        }
        assert!(matches!(
            extract_log_likelihoods(&store, "unknown", Channel::Y),
            Err(PosteriorError::Load { .. })
        ));
    }

    #[test]
    fn not_a_four_dimensional_tensor() {
        let mut fit = PosteriorFit::new();
        fit.insert(Y_LOG_LIK, Array::zeros(IxDyn(&[2, 3])));
        assert!(matches!(
            log_likelihoods_of_fit(&fit, Channel::Y),
            Err(PosteriorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn parse_channels() {
        assert_eq!("Both".parse::<Channel>().unwrap(), Channel::Both);
        assert_eq!("y".parse::<Channel>().unwrap(), Channel::Y);
        assert!(matches!(
            "rt".parse::<Channel>(),
            Err(PosteriorError::InvalidArgument(_))
        ));
    }
}
