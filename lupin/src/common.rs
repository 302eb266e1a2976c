pub use clap::{Args, Parser, Subcommand};
pub use log::info;

pub use mcmc_util::comparison::{ComparisonConfig, Metric};
pub use mcmc_util::fit_io::{FitSource, FitStore, DEFAULT_FIT_DIR, DEFAULT_FIT_FILE};
pub use mcmc_util::log_lik::Channel;
pub use mcmc_util::waic::WaicFormula;

/// Where the fitted models live
#[derive(Args, Debug, Clone)]
pub struct FitArgs {
    /// Directory holding one sub-directory per model
    #[arg(long, default_value = DEFAULT_FIT_DIR)]
    pub fit_dir: Box<str>,

    /// File name of each model's posterior draws
    #[arg(
        long,
        default_value = DEFAULT_FIT_FILE,
        long_help = "File name of each model's posterior draws.\n\
		     JSON map of variable name to array, gzipped if it ends with `.gz`."
    )]
    pub fit_file: Box<str>,
}

impl FitArgs {
    pub fn store(&self) -> FitStore {
        FitStore::new(&*self.fit_dir, &self.fit_file)
    }
}

/// How pointwise elpd is estimated
#[derive(Args, Debug, Clone)]
pub struct CriterionArgs {
    /// Information criterion: `waic` or `loo`
    #[arg(long, short, default_value_t = Metric::Waic)]
    pub metric: Metric,

    /// Log-likelihood channel: `y`, `m` or `both`
    #[arg(long, default_value_t = Channel::Both)]
    pub on: Channel,

    /// Evaluate WAIC's log predictive density by log-sum-exp
    #[arg(
        long,
        long_help = "Evaluate WAIC's log predictive density by log-sum-exp.\n\
		     Without it, `log(mean(exp(ll)))` is taken as written,\n\
		     which under/overflows for very large log-likelihoods."
    )]
    pub stable_waic: bool,
}

impl CriterionArgs {
    pub fn config(&self, verbose: bool) -> ComparisonConfig {
        ComparisonConfig {
            metric: self.metric,
            channel: self.on,
            waic_formula: if self.stable_waic {
                WaicFormula::LogSumExp
            } else {
                WaicFormula::Literal
            },
            verbose,
        }
    }
}

pub fn init_logger(verbose: bool) {
    if verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}
