use crate::traits::*;
use ndarray::prelude::*;
use ndarray::{Data, Dimension};
use num_traits::{Float, FromPrimitive};

impl<S, D, T> ElementwiseOps for ArrayBase<S, D>
where
    S: Data<Elem = T>,
    D: Dimension,
    T: Float + FromPrimitive,
{
    type Mat = Array<T, D>;
    type Scalar = T;

    fn zscore(&self) -> Self::Mat {
        match self.mean() {
            Some(mu) => {
                let sig = self.std(T::zero());
                self.mapv(|x| (x - mu) / sig)
            }
            None => self.to_owned(),
        }
    }

    fn inv_logit(&self) -> Self::Mat {
        self.mapv(|x| T::one() / (T::one() + (-x).exp()))
    }

    fn phi_approx(&self) -> Self::Mat {
        let a = T::from_f64(0.07056).expect("failed to type");
        let b = T::from_f64(1.5976).expect("failed to type");
        self.mapv(|x| a * x.powi(3) + b * x).inv_logit()
    }
}

impl<S, T> FlattenOps for ArrayBase<S, IxDyn>
where
    S: Data<Elem = T>,
    T: Clone,
{
    type Mat = Array2<T>;

    fn flatten_trailing_axes(&self) -> anyhow::Result<Self::Mat> {
        let shape = self.shape();
        if shape.is_empty() {
            anyhow::bail!("can't flatten a zero-dimensional array");
        }
        let ndraw = shape[0];
        let nobs = shape[1..].iter().product::<usize>();

        Ok(self
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((ndraw, nobs))?)
    }
}
