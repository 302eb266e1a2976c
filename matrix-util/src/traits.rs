/// Elementwise transforms of real-valued arrays
pub trait ElementwiseOps {
    type Mat;
    type Scalar;

    /// Standardize all elements, `(x - mean) / sd`, using the
    /// population standard deviation
    fn zscore(&self) -> Self::Mat;

    /// Logistic function, `1 / (1 + exp(-x))`
    fn inv_logit(&self) -> Self::Mat;

    /// Fast logistic approximation to the standard normal CDF
    ///
    /// $$\Phi(x) \approx \textrm{logit}^{-1}(0.07056 x^3 + 1.5976 x)$$
    ///
    /// Bowling et al. (2009). "A logistic approximation to the
    /// cumulative normal distribution."
    fn phi_approx(&self) -> Self::Mat;
}

/// Collapse an n-dimensional array of draws into a matrix
pub trait FlattenOps {
    type Mat;

    /// Keep the first (draw) axis and flatten the remaining axes
    /// into one in row-major order, so `(s, i, j, k)` goes to
    /// `(s, (i * nj + j) * nk + k)`.
    fn flatten_trailing_axes(&self) -> anyhow::Result<Self::Mat>;
}

/// Column-wise operations on a (draws x observations) matrix
pub trait ColumnOps {
    type Mat;
    type DVec;
    type Scalar;

    /// Sum of each column
    fn column_sums(&self) -> Self::DVec;

    /// Keep the columns flagged `true`
    /// * `keep` - one flag per column
    fn select_columns(&self, keep: &[bool]) -> anyhow::Result<Self::Mat>;

    /// `[self | other]`; both must have the same number of rows
    fn concat_columns(&self, other: &Self) -> anyhow::Result<Self::Mat>;

    /// `log(sum_s exp(x[s, j]))` with the max-shift trick
    fn log_sum_exp_columns(&self) -> Self::DVec;

    /// `log(mean_s exp(x[s, j]))` with the max-shift trick
    fn log_mean_exp_columns(&self) -> Self::DVec;
}
