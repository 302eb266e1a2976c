use crate::traits::ColumnOps;
use ndarray::prelude::*;
use ndarray::{concatenate, Data};
use num_traits::{Float, FromPrimitive};

impl<S, T> ColumnOps for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
    T: Float + FromPrimitive,
{
    type Mat = Array2<T>;
    type DVec = Array1<T>;
    type Scalar = T;

    fn column_sums(&self) -> Self::DVec {
        self.sum_axis(Axis(0))
    }

    fn select_columns(&self, keep: &[bool]) -> anyhow::Result<Self::Mat> {
        if keep.len() != self.ncols() {
            anyhow::bail!(
                "{} column flags for a matrix with {} columns",
                keep.len(),
                self.ncols()
            );
        }
        let idx: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(j, &k)| if k { Some(j) } else { None })
            .collect();
        Ok(self.select(Axis(1), &idx))
    }

    fn concat_columns(&self, other: &Self) -> anyhow::Result<Self::Mat> {
        if self.nrows() != other.nrows() {
            anyhow::bail!(
                "can't concatenate {} rows with {} rows",
                self.nrows(),
                other.nrows()
            );
        }
        Ok(concatenate(Axis(1), &[self.view(), other.view()])?)
    }

    fn log_sum_exp_columns(&self) -> Self::DVec {
        self.map_axis(Axis(0), |x_j| log_sum_exp(x_j.iter().copied()))
    }

    fn log_mean_exp_columns(&self) -> Self::DVec {
        let ln_n = T::from_usize(self.nrows())
            .expect("failed to type")
            .ln();
        self.log_sum_exp_columns().mapv(|v| v - ln_n)
    }
}

/// `log(sum(exp(x)))` shifted by the maximum value
///
/// An empty input and an all `-inf` input give `-inf`.
pub fn log_sum_exp<T, I>(xx: I) -> T
where
    T: Float,
    I: Iterator<Item = T> + Clone,
{
    let max_x = xx.clone().fold(T::neg_infinity(), T::max);
    if !max_x.is_finite() {
        return max_x;
    }
    let tot = xx.fold(T::zero(), |acc, x| acc + (x - max_x).exp());
    max_x + tot.ln()
}
